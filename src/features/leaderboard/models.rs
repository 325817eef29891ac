use serde::{Deserialize, Serialize};

/// 排行榜参与者（输入序列的顺序即名次顺序）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// 昵称
    pub nickname: String,
    /// 头像地址（http(s) URL、data URI 或本地路径）
    pub avatar_url: String,
    /// 等级
    pub level: i64,
    /// 当前经验
    pub xp: f64,
    /// 升到下一级所需经验
    pub needed_xp: f64,
}

impl Participant {
    pub fn new(
        nickname: impl Into<String>,
        avatar_url: impl Into<String>,
        level: i64,
        xp: f64,
        needed_xp: f64,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            avatar_url: avatar_url.into(),
            level,
            xp,
            needed_xp,
        }
    }
}

/// 段位：按经验阈值划分的命名区间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankTier {
    pub name: String,
    pub color: String,
    pub min_xp: f64,
}

impl RankTier {
    pub fn new(name: impl Into<String>, color: impl Into<String>, min_xp: f64) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            min_xp,
        }
    }
}

/// 渐变方向/形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GradientKind {
    ToRight,
    ToLeft,
    ToBottom,
    ToTop,
    ToBottomRight,
    ToBottomLeft,
    /// 以画布中心为圆心，半径取宽高较大者的一半
    Radial,
}

impl GradientKind {
    /// 名称解析；无法识别的名称退回左上到右下的对角线
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "to-right" => GradientKind::ToRight,
            "to-left" => GradientKind::ToLeft,
            "to-bottom" => GradientKind::ToBottom,
            "to-top" => GradientKind::ToTop,
            "to-bottom-right" => GradientKind::ToBottomRight,
            "to-bottom-left" => GradientKind::ToBottomLeft,
            "radial" => GradientKind::Radial,
            other => {
                tracing::debug!("未知渐变类型 '{}'，使用 to-bottom-right", other);
                GradientKind::ToBottomRight
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GradientKind::ToRight => "to-right",
            GradientKind::ToLeft => "to-left",
            GradientKind::ToBottom => "to-bottom",
            GradientKind::ToTop => "to-top",
            GradientKind::ToBottomRight => "to-bottom-right",
            GradientKind::ToBottomLeft => "to-bottom-left",
            GradientKind::Radial => "radial",
        }
    }
}

impl From<String> for GradientKind {
    fn from(value: String) -> Self {
        GradientKind::from_name(&value)
    }
}

impl From<GradientKind> for String {
    fn from(value: GradientKind) -> Self {
        value.name().to_string()
    }
}

/// 极光背景上的一个径向光斑
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuroraSpot {
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// 背景描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BackgroundSpec {
    /// 纯色
    Solid { color: String },
    /// 渐变（颜色均匀分布在 [0, 1]）
    Gradient {
        kind: GradientKind,
        colors: Vec<String>,
    },
    /// 底色 + 若干半透明径向光斑
    #[serde(rename_all = "camelCase")]
    Aurora {
        base_color: String,
        #[serde(default)]
        spots: Vec<AuroraSpot>,
    },
}

impl Default for BackgroundSpec {
    fn default() -> Self {
        BackgroundSpec::Gradient {
            kind: GradientKind::ToBottomRight,
            colors: vec!["#1a1a2e".to_string(), "#16213e".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BackgroundSpec, GradientKind, Participant};

    #[test]
    fn participant_uses_camel_case_fields() {
        let p: Participant = serde_json::from_str(
            r#"{"nickname":"Alice","avatarUrl":"a.png","level":3,"xp":10,"neededXp":20}"#,
        )
        .expect("deserialize");
        assert_eq!(p.avatar_url, "a.png");
        assert_eq!(p.needed_xp, 20.0);
    }

    #[test]
    fn unknown_gradient_kind_falls_back_to_diagonal() {
        let spec: BackgroundSpec = serde_json::from_str(
            r##"{"type":"gradient","kind":"spiral","colors":["#000","#fff"]}"##,
        )
        .expect("deserialize");
        assert_eq!(
            spec,
            BackgroundSpec::Gradient {
                kind: GradientKind::ToBottomRight,
                colors: vec!["#000".into(), "#fff".into()],
            }
        );
    }

    #[test]
    fn aurora_spec_parses_base_color_and_spots() {
        let spec: BackgroundSpec = serde_json::from_str(
            r##"{"type":"aurora","baseColor":"#0b0b1a","spots":[{"color":"#ff00aa","x":100,"y":50,"radius":300}]}"##,
        )
        .expect("deserialize");
        match spec {
            BackgroundSpec::Aurora { base_color, spots } => {
                assert_eq!(base_color, "#0b0b1a");
                assert_eq!(spots.len(), 1);
                assert_eq!(spots[0].radius, 300.0);
            }
            other => panic!("unexpected spec: {other:?}"),
        }
    }
}
