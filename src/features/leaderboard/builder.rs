use serde::{Deserialize, Serialize};

use super::models::{BackgroundSpec, RankTier};
use super::rank::sort_tiers_desc;

const DEFAULT_TITLE: &str = "Leaderboard";
const DEFAULT_BAR_PRIMARY: &str = "#5865F2";
const DEFAULT_BAR_SECONDARY: &str = "#EB459E";

/// 可单独设置字体的文本元素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSlot {
    Title,
    Subtitle,
    Position,
    Nickname,
    Level,
    Xp,
    Rank,
}

impl FontSlot {
    /// 各元素的默认 CSS font 字符串
    pub fn default_style(self) -> &'static str {
        match self {
            FontSlot::Title => "bold 40px sans-serif",
            FontSlot::Subtitle => "24px sans-serif",
            FontSlot::Position => "bold 28px sans-serif",
            FontSlot::Nickname => "bold 24px sans-serif",
            FontSlot::Level => "16px sans-serif",
            FontSlot::Xp => "14px sans-serif",
            FontSlot::Rank => "bold 20px sans-serif",
        }
    }
}

/// 用户可覆盖的字体（CSS font 简写）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontOverrides {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub position: Option<String>,
    pub nickname: Option<String>,
    pub level: Option<String>,
    pub xp: Option<String>,
    pub rank: Option<String>,
}

impl FontOverrides {
    fn slot_mut(&mut self, slot: FontSlot) -> &mut Option<String> {
        match slot {
            FontSlot::Title => &mut self.title,
            FontSlot::Subtitle => &mut self.subtitle,
            FontSlot::Position => &mut self.position,
            FontSlot::Nickname => &mut self.nickname,
            FontSlot::Level => &mut self.level,
            FontSlot::Xp => &mut self.xp,
            FontSlot::Rank => &mut self.rank,
        }
    }

    fn slot(&self, slot: FontSlot) -> Option<&str> {
        match slot {
            FontSlot::Title => self.title.as_deref(),
            FontSlot::Subtitle => self.subtitle.as_deref(),
            FontSlot::Position => self.position.as_deref(),
            FontSlot::Nickname => self.nickname.as_deref(),
            FontSlot::Level => self.level.as_deref(),
            FontSlot::Xp => self.xp.as_deref(),
            FontSlot::Rank => self.rank.as_deref(),
        }
    }
}

/// 领奖台（前三名）强调边框颜色
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodiumColors {
    pub first: Option<String>,
    pub second: Option<String>,
    pub third: Option<String>,
}

/// 经验条渐变颜色
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpBarColors {
    pub primary: String,
    pub secondary: String,
}

impl Default for XpBarColors {
    fn default() -> Self {
        Self {
            primary: DEFAULT_BAR_PRIMARY.to_string(),
            secondary: DEFAULT_BAR_SECONDARY.to_string(),
        }
    }
}

/// 用户侧的排行榜选项（全部可选，HTTP 请求体直接反序列化为该结构）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeaderboardOptions {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub background: Option<BackgroundSpec>,
    pub podium_colors: PodiumColors,
    pub xp_bar_colors: Option<XpBarColors>,
    pub fonts: FontOverrides,
    pub show_rank: Option<bool>,
    pub ranks: Vec<RankTier>,
}

/// 解析完成的字体表
#[derive(Debug, Clone, PartialEq)]
pub struct FontStyles {
    overrides: FontOverrides,
}

impl FontStyles {
    /// 该元素的字体字符串（未配置时使用默认值）
    pub fn get(&self, slot: FontSlot) -> &str {
        self.overrides
            .slot(slot)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| slot.default_style())
    }
}

/// 一次渲染使用的不可变配置快照
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub title: String,
    /// 仅在非空时存在
    pub subtitle: Option<String>,
    pub background: BackgroundSpec,
    pub podium_colors: [Option<String>; 3],
    pub xp_bar_colors: XpBarColors,
    pub fonts: FontStyles,
    pub show_rank: bool,
    /// 已按 `min_xp` 降序稳定排序
    pub tiers: Vec<RankTier>,
}

impl RenderConfig {
    /// 1 起始名次对应的领奖台颜色
    pub fn podium_color(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.podium_colors.get(i))
            .and_then(|c| c.as_deref())
    }

    pub fn has_subtitle(&self) -> bool {
        self.subtitle.is_some()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        LeaderboardBuilder::new().build()
    }
}

/// 链式构建 [`RenderConfig`]
#[derive(Debug, Clone, Default)]
pub struct LeaderboardBuilder {
    options: LeaderboardOptions,
}

impl LeaderboardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: LeaderboardOptions) -> Self {
        Self { options }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.options.title = Some(title.into());
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.options.subtitle = Some(subtitle.into());
        self
    }

    pub fn background(mut self, background: BackgroundSpec) -> Self {
        self.options.background = Some(background);
        self
    }

    /// 设置第 `position`（1..=3）名的强调色，其余名次忽略
    pub fn podium_color(mut self, position: usize, color: impl Into<String>) -> Self {
        let slot = match position {
            1 => &mut self.options.podium_colors.first,
            2 => &mut self.options.podium_colors.second,
            3 => &mut self.options.podium_colors.third,
            _ => {
                tracing::debug!("忽略领奖台颜色：名次 {} 超出 1..=3", position);
                return self;
            }
        };
        *slot = Some(color.into());
        self
    }

    pub fn xp_bar_colors(mut self, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        self.options.xp_bar_colors = Some(XpBarColors {
            primary: primary.into(),
            secondary: secondary.into(),
        });
        self
    }

    pub fn font(mut self, slot: FontSlot, style: impl Into<String>) -> Self {
        *self.options.fonts.slot_mut(slot) = Some(style.into());
        self
    }

    pub fn show_rank(mut self, show: bool) -> Self {
        self.options.show_rank = Some(show);
        self
    }

    pub fn rank(mut self, name: impl Into<String>, color: impl Into<String>, min_xp: f64) -> Self {
        self.options.ranks.push(RankTier::new(name, color, min_xp));
        self
    }

    pub fn ranks(mut self, tiers: impl IntoIterator<Item = RankTier>) -> Self {
        self.options.ranks.extend(tiers);
        self
    }

    pub fn build(self) -> RenderConfig {
        let LeaderboardOptions {
            title,
            subtitle,
            background,
            podium_colors,
            xp_bar_colors,
            fonts,
            show_rank,
            mut ranks,
        } = self.options;

        sort_tiers_desc(&mut ranks);

        RenderConfig {
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            subtitle: subtitle.filter(|s| !s.is_empty()),
            background: background.unwrap_or_default(),
            podium_colors: [podium_colors.first, podium_colors.second, podium_colors.third],
            xp_bar_colors: xp_bar_colors.unwrap_or_default(),
            fonts: FontStyles { overrides: fonts },
            show_rank: show_rank.unwrap_or(true),
            tiers: ranks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FontSlot, LeaderboardBuilder, LeaderboardOptions};
    use crate::features::leaderboard::models::BackgroundSpec;

    #[test]
    fn defaults_are_resolved() {
        let cfg = LeaderboardBuilder::new().build();
        assert_eq!(cfg.title, "Leaderboard");
        assert!(cfg.subtitle.is_none());
        assert!(cfg.show_rank);
        assert!(cfg.tiers.is_empty());
        assert_eq!(cfg.background, BackgroundSpec::default());
        assert_eq!(cfg.fonts.get(FontSlot::Title), "bold 40px sans-serif");
        assert_eq!(cfg.podium_color(1), None);
    }

    #[test]
    fn empty_subtitle_is_treated_as_absent() {
        let cfg = LeaderboardBuilder::new().subtitle("").build();
        assert!(!cfg.has_subtitle());
        let cfg = LeaderboardBuilder::new().subtitle("Season 3").build();
        assert_eq!(cfg.subtitle.as_deref(), Some("Season 3"));
    }

    #[test]
    fn tiers_are_sorted_descending_on_build() {
        let cfg = LeaderboardBuilder::new()
            .rank("Bronze", "#cd7f32", 0.0)
            .rank("Gold", "#ffd700", 5000.0)
            .rank("Silver", "#c0c0c0", 1000.0)
            .build();
        let mins: Vec<f64> = cfg.tiers.iter().map(|t| t.min_xp).collect();
        assert_eq!(mins, [5000.0, 1000.0, 0.0]);
    }

    #[test]
    fn podium_colors_only_cover_top_three() {
        let cfg = LeaderboardBuilder::new()
            .podium_color(1, "#FFD700")
            .podium_color(3, "#CD7F32")
            .podium_color(4, "#000000")
            .build();
        assert_eq!(cfg.podium_color(1), Some("#FFD700"));
        assert_eq!(cfg.podium_color(2), None);
        assert_eq!(cfg.podium_color(3), Some("#CD7F32"));
        assert_eq!(cfg.podium_color(4), None);
        assert_eq!(cfg.podium_color(0), None);
    }

    #[test]
    fn blank_font_override_falls_back_to_default() {
        let cfg = LeaderboardBuilder::new()
            .font(FontSlot::Nickname, "  ")
            .font(FontSlot::Rank, "italic 18px Inter")
            .build();
        assert_eq!(cfg.fonts.get(FontSlot::Nickname), "bold 24px sans-serif");
        assert_eq!(cfg.fonts.get(FontSlot::Rank), "italic 18px Inter");
    }

    #[test]
    fn options_deserialize_from_camel_case_json() {
        let opts: LeaderboardOptions = serde_json::from_str(
            r##"{
                "title": "Weekly",
                "showRank": false,
                "podiumColors": {"first": "#FFD700"},
                "xpBarColors": {"primary": "#111111", "secondary": "#222222"},
                "fonts": {"title": "bold 48px Inter"},
                "ranks": [{"name": "Pro", "color": "#5865F2", "minXp": 1000}]
            }"##,
        )
        .expect("deserialize");
        let cfg = LeaderboardBuilder::from_options(opts).build();
        assert_eq!(cfg.title, "Weekly");
        assert!(!cfg.show_rank);
        assert_eq!(cfg.podium_color(1), Some("#FFD700"));
        assert_eq!(cfg.xp_bar_colors.secondary, "#222222");
        assert_eq!(cfg.fonts.get(FontSlot::Title), "bold 48px Inter");
        assert_eq!(cfg.tiers[0].name, "Pro");
    }
}
