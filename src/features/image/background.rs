use crate::features::leaderboard::{AuroraSpot, BackgroundSpec, GradientKind};

use super::surface::{GradientStop, Paint, Surface};

/// 极光光斑统一使用的全局透明度
const AURORA_SPOT_ALPHA: f64 = 0.4;

/// 按背景描述铺满 `width × height` 矩形
pub fn paint_background(surface: &mut Surface, width: f64, height: f64, spec: &BackgroundSpec) {
    match spec {
        BackgroundSpec::Solid { color } => {
            surface.fill_rect(0.0, 0.0, width, height, &Paint::color(color));
        }
        BackgroundSpec::Gradient { kind, colors } => {
            paint_gradient(surface, width, height, *kind, colors);
        }
        BackgroundSpec::Aurora { base_color, spots } => {
            paint_aurora(surface, width, height, base_color, spots);
        }
    }
}

/// 色标均匀分布：第 i 个位于 i / (n - 1)
pub fn evenly_spaced_stops(colors: &[String]) -> Vec<GradientStop> {
    let last = colors.len().saturating_sub(1);
    colors
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let offset = if last == 0 {
                0.0
            } else {
                i as f64 / last as f64
            };
            GradientStop::new(offset, color)
        })
        .collect()
}

fn paint_gradient(
    surface: &mut Surface,
    width: f64,
    height: f64,
    kind: GradientKind,
    colors: &[String],
) {
    match colors {
        [] => {
            tracing::warn!("渐变背景未提供任何颜色，跳过背景绘制");
            return;
        }
        // 单色渐变退化为纯色
        [only] => {
            surface.fill_rect(0.0, 0.0, width, height, &Paint::color(only));
            return;
        }
        _ => {}
    }

    let stops = evenly_spaced_stops(colors);
    let paint = match kind {
        GradientKind::Radial => surface.radial_gradient(
            (width / 2.0, height / 2.0),
            width.max(height) / 2.0,
            &stops,
        ),
        linear => {
            let (from, to) = linear_endpoints(linear, width, height);
            surface.linear_gradient(from, to, &stops)
        }
    };
    surface.fill_rect(0.0, 0.0, width, height, &paint);
}

/// 线性渐变起止点
fn linear_endpoints(kind: GradientKind, w: f64, h: f64) -> ((f64, f64), (f64, f64)) {
    match kind {
        GradientKind::ToRight => ((0.0, 0.0), (w, 0.0)),
        GradientKind::ToLeft => ((w, 0.0), (0.0, 0.0)),
        GradientKind::ToBottom => ((0.0, 0.0), (0.0, h)),
        GradientKind::ToTop => ((0.0, h), (0.0, 0.0)),
        GradientKind::ToBottomLeft => ((w, 0.0), (0.0, h)),
        GradientKind::ToBottomRight | GradientKind::Radial => ((0.0, 0.0), (w, h)),
    }
}

fn paint_aurora(
    surface: &mut Surface,
    width: f64,
    height: f64,
    base_color: &str,
    spots: &[AuroraSpot],
) {
    surface.fill_rect(0.0, 0.0, width, height, &Paint::color(base_color));

    surface.set_global_alpha(AURORA_SPOT_ALPHA);
    // 按给定顺序叠加，后者覆盖在前者之上
    for (i, spot) in spots.iter().enumerate() {
        if !(spot.radius.is_finite() && spot.radius > 0.0) {
            tracing::debug!("极光光斑 #{} 半径无效（{}），已跳过", i, spot.radius);
            continue;
        }
        let stops = [
            GradientStop::new(0.0, &spot.color),
            GradientStop::new(1.0, &spot.color).with_opacity(0.0),
        ];
        let paint = surface.radial_gradient((spot.x, spot.y), spot.radius, &stops);
        surface.fill_rect(0.0, 0.0, width, height, &paint);
    }
    surface.set_global_alpha(1.0);
}
