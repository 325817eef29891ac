//! 画布尺寸与行几何。
//!
//! 纵向尺寸由标题区是否带副标题与行数决定；横向几何全部为固定常量。

/// 画布宽度
pub const CANVAS_WIDTH: u32 = 900;
/// 仅主标题时的标题区高度
pub const HEADER_HEIGHT: u32 = 120;
/// 带副标题时的标题区高度
pub const HEADER_HEIGHT_WITH_SUBTITLE: u32 = 150;
/// 每行占用高度（含行间距）
pub const ROW_HEIGHT: u32 = 100;
/// 底部留白
pub const FOOTER_PADDING: u32 = 20;

/// 行卡片左右边距
pub const CARD_MARGIN: f64 = 30.0;
/// 行卡片高度（与下一行之间留 10px）
pub const CARD_HEIGHT: f64 = 90.0;
pub const CARD_RADIUS: f64 = 15.0;

/// 名次数字居中位置
pub const POSITION_X: f64 = 80.0;

pub const AVATAR_CENTER_X: f64 = 170.0;
pub const AVATAR_RADIUS: f64 = 30.0;

/// 昵称与等级文字起点
pub const TEXT_X: f64 = 225.0;

pub const BAR_X: f64 = 450.0;
pub const BAR_HEIGHT: f64 = 10.0;
pub const BAR_RADIUS: f64 = 5.0;
const BAR_WIDTH_WITH_RANK: f64 = 200.0;
const BAR_WIDTH_WITHOUT_RANK: f64 = 350.0;

/// 段位文字右对齐位置距右边缘的距离
pub const RANK_RIGHT_INSET: f64 = 50.0;

/// 一次渲染的纵向布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub header_height: u32,
    pub row_height: u32,
    pub total_height: u32,
}

impl Layout {
    /// 由副标题存在与否及行数推导布局
    pub fn compute(has_subtitle: bool, row_count: usize) -> Self {
        let header_height = if has_subtitle {
            HEADER_HEIGHT_WITH_SUBTITLE
        } else {
            HEADER_HEIGHT
        };
        let rows = u32::try_from(row_count).unwrap_or(u32::MAX);
        let total_height = header_height
            .saturating_add(rows.saturating_mul(ROW_HEIGHT))
            .saturating_add(FOOTER_PADDING);
        Self {
            width: CANVAS_WIDTH,
            header_height,
            row_height: ROW_HEIGHT,
            total_height,
        }
    }

    /// 第 `index`（0 起始）行的顶部 y 坐标
    pub fn row_offset(&self, index: usize) -> f64 {
        f64::from(self.header_height) + index as f64 * f64::from(self.row_height)
    }

    /// 段位文字的右对齐 x 坐标
    pub fn rank_x(&self) -> f64 {
        f64::from(self.width) - RANK_RIGHT_INSET
    }

    /// 行卡片宽度
    pub fn card_width(&self) -> f64 {
        f64::from(self.width) - CARD_MARGIN * 2.0
    }
}

/// 经验条宽度：隐藏段位列时经验条占用其空间
pub fn bar_width(show_rank: bool) -> f64 {
    if show_rank {
        BAR_WIDTH_WITH_RANK
    } else {
        BAR_WIDTH_WITHOUT_RANK
    }
}
