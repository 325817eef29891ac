use crate::features::leaderboard::{FontSlot, Participant, RenderConfig, rank};

use super::font::FontSpec;
use super::layout::{
    AVATAR_CENTER_X, AVATAR_RADIUS, BAR_HEIGHT, BAR_RADIUS, BAR_X, CARD_HEIGHT, CARD_MARGIN,
    CARD_RADIUS, Layout, POSITION_X, TEXT_X, bar_width,
};
use super::surface::{GradientStop, Paint, Surface, TextAnchor};

const TEXT_COLOR: &str = "#FFFFFF";
const SECONDARY_TEXT_COLOR: &str = "#B9BBBE";
const CARD_FILL_OPACITY: f64 = 0.1;
const CARD_BORDER_OPACITY: f64 = 0.2;
const PODIUM_BORDER_WIDTH: f64 = 2.0;
const TRACK_OPACITY: f64 = 0.3;

// 行内纵向偏移（相对行顶部，文字为基线位置）
const POSITION_BASELINE: f64 = 55.0;
const NICKNAME_BASELINE: f64 = 40.0;
const LEVEL_BASELINE: f64 = 65.0;
const BAR_TOP: f64 = 40.0;
const XP_TEXT_BASELINE: f64 = 70.0;
const RANK_BASELINE: f64 = 55.0;

/// 经验条填充比例：`xp / needed_xp` 截断到 [0, 1]；`needed_xp <= 0` 时为 0
pub fn fill_ratio(xp: f64, needed_xp: f64) -> f64 {
    if needed_xp > 0.0 {
        let ratio = xp / needed_xp;
        if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) }
    } else {
        0.0
    }
}

/// 经验文字显示原始值，不截断
pub fn xp_text(xp: f64, needed_xp: f64) -> String {
    format!("{xp} / {needed_xp}")
}

/// 绘制单行。`avatar` 为已解码头像的 data URI，缺失时该行不绘制头像。
///
/// 绘制顺序即叠放顺序：卡片、领奖台边框、名次、头像、昵称/等级、经验条、段位。
pub fn paint_row(
    surface: &mut Surface,
    layout: &Layout,
    index: usize,
    participant: &Participant,
    config: &RenderConfig,
    avatar: Option<&str>,
) {
    let top = layout.row_offset(index);
    let position = index + 1;
    let font = |slot: FontSlot| FontSpec::resolve(config.fonts.get(slot), slot.default_style());

    // 卡片
    let card_w = layout.card_width();
    surface.fill_rounded_rect(
        CARD_MARGIN,
        top,
        card_w,
        CARD_HEIGHT,
        CARD_RADIUS,
        &Paint::color_alpha("#FFFFFF", CARD_FILL_OPACITY),
    );
    surface.stroke_rounded_rect(
        CARD_MARGIN,
        top,
        card_w,
        CARD_HEIGHT,
        CARD_RADIUS,
        &Paint::color_alpha("#FFFFFF", CARD_BORDER_OPACITY),
        1.0,
    );

    if let Some(accent) = config.podium_color(position) {
        surface.stroke_rounded_rect(
            CARD_MARGIN,
            top,
            card_w,
            CARD_HEIGHT,
            CARD_RADIUS,
            &Paint::color(accent),
            PODIUM_BORDER_WIDTH,
        );
    }

    surface.fill_text(
        &format!("#{position}"),
        POSITION_X,
        top + POSITION_BASELINE,
        &font(FontSlot::Position),
        TEXT_COLOR,
        TextAnchor::Middle,
    );

    if let Some(href) = avatar {
        surface.draw_image_in_circle(href, AVATAR_CENTER_X, top + CARD_HEIGHT / 2.0, AVATAR_RADIUS);
    }

    surface.fill_text(
        &participant.nickname,
        TEXT_X,
        top + NICKNAME_BASELINE,
        &font(FontSlot::Nickname),
        TEXT_COLOR,
        TextAnchor::Start,
    );
    surface.fill_text(
        &format!("Level {}", participant.level),
        TEXT_X,
        top + LEVEL_BASELINE,
        &font(FontSlot::Level),
        SECONDARY_TEXT_COLOR,
        TextAnchor::Start,
    );

    paint_xp_bar(surface, top, participant, config, &font(FontSlot::Xp));

    if config.show_rank
        && let Some(tier) = rank::resolve(&config.tiers, participant.xp)
    {
        surface.fill_text(
            &tier.name,
            layout.rank_x(),
            top + RANK_BASELINE,
            &font(FontSlot::Rank),
            &tier.color,
            TextAnchor::End,
        );
    }
}

fn paint_xp_bar(
    surface: &mut Surface,
    top: f64,
    participant: &Participant,
    config: &RenderConfig,
    font: &FontSpec,
) {
    let bar_w = bar_width(config.show_rank);
    let bar_y = top + BAR_TOP;

    surface.fill_rounded_rect(
        BAR_X,
        bar_y,
        bar_w,
        BAR_HEIGHT,
        BAR_RADIUS,
        &Paint::color_alpha("#000000", TRACK_OPACITY),
    );

    let ratio = fill_ratio(participant.xp, participant.needed_xp);
    if ratio > 0.0 {
        // 渐变跨越整条经验条，颜色进度与填充比例无关
        let stops = [
            GradientStop::new(0.0, &config.xp_bar_colors.primary),
            GradientStop::new(1.0, &config.xp_bar_colors.secondary),
        ];
        let paint = surface.linear_gradient((BAR_X, bar_y), (BAR_X + bar_w, bar_y), &stops);
        surface.fill_rounded_rect(BAR_X, bar_y, bar_w * ratio, BAR_HEIGHT, BAR_RADIUS, &paint);
    }

    surface.fill_text(
        &xp_text(participant.xp, participant.needed_xp),
        BAR_X,
        top + XP_TEXT_BASELINE,
        font,
        SECONDARY_TEXT_COLOR,
        TextAnchor::Start,
    );
}
