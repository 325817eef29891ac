use super::models::RankTier;

/// 按 `min_xp` 降序稳定排序；阈值相同的段位保持原相对顺序
pub fn sort_tiers_desc(tiers: &mut [RankTier]) {
    tiers.sort_by(|a, b| b.min_xp.total_cmp(&a.min_xp));
}

/// 在已按 `min_xp` 降序排列的段位中查找经验值所属段位。
///
/// 返回第一个 `min_xp <= xp` 的段位；段位为空或经验低于所有阈值时返回 None。
pub fn resolve(tiers: &[RankTier], xp: f64) -> Option<&RankTier> {
    tiers.iter().find(|tier| tier.min_xp <= xp)
}

#[cfg(test)]
mod tests {
    use super::{resolve, sort_tiers_desc};
    use crate::features::leaderboard::models::RankTier;

    fn tiers() -> Vec<RankTier> {
        let mut tiers = vec![
            RankTier::new("Bronze", "#cd7f32", 0.0),
            RankTier::new("Gold", "#ffd700", 5000.0),
            RankTier::new("Silver", "#c0c0c0", 1000.0),
        ];
        sort_tiers_desc(&mut tiers);
        tiers
    }

    #[test]
    fn empty_tiers_resolve_to_none() {
        assert!(resolve(&[], 100.0).is_none());
    }

    #[test]
    fn resolves_highest_qualifying_tier() {
        let tiers = tiers();
        assert_eq!(resolve(&tiers, 0.0).unwrap().name, "Bronze");
        assert_eq!(resolve(&tiers, 999.9).unwrap().name, "Bronze");
        assert_eq!(resolve(&tiers, 1000.0).unwrap().name, "Silver");
        assert_eq!(resolve(&tiers, 4999.0).unwrap().name, "Silver");
        assert_eq!(resolve(&tiers, 1e9).unwrap().name, "Gold");
    }

    #[test]
    fn resolved_tier_is_never_beaten_by_a_higher_threshold() {
        let tiers = tiers();
        for xp in [0.0, 1.0, 999.0, 1000.0, 2500.0, 5000.0, 12345.0] {
            let found = resolve(&tiers, xp).expect("above minimum tier");
            assert!(found.min_xp <= xp);
            assert!(
                !tiers
                    .iter()
                    .any(|t| t.min_xp > found.min_xp && t.min_xp <= xp)
            );
        }
    }

    #[test]
    fn below_all_thresholds_is_none() {
        let tiers = vec![RankTier::new("Pro", "#5865F2", 1000.0)];
        assert!(resolve(&tiers, 500.0).is_none());
    }

    #[test]
    fn equal_thresholds_keep_original_order() {
        let mut tiers = vec![
            RankTier::new("A", "#111111", 100.0),
            RankTier::new("Top", "#000000", 900.0),
            RankTier::new("B", "#222222", 100.0),
        ];
        sort_tiers_desc(&mut tiers);
        let names: Vec<_> = tiers.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Top", "A", "B"]);
        assert_eq!(resolve(&tiers, 150.0).unwrap().name, "A");
    }
}
