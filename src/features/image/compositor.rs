use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream;

use crate::config::{AppConfig, ImageRenderConfig};
use crate::error::AppError;
use crate::features::leaderboard::{FontSlot, Participant, RenderConfig};

use super::avatar::{AvatarSource, HttpAvatarSource, load_avatar};
use super::background::paint_background;
use super::font::FontSpec;
use super::layout::{AVATAR_RADIUS, Layout};
use super::raster::render_svg_to_png_async;
use super::row::paint_row;
use super::surface::{DropShadow, Surface, TextAnchor};

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// 头像按 2 倍分辨率解码，避免缩放后发虚
const AVATAR_DECODE_SIZE: u32 = (AVATAR_RADIUS as u32) * 2 * 2;

const TITLE_COLOR: &str = "#FFFFFF";
const SUBTITLE_COLOR: &str = "#B9BBBE";
const TITLE_BASELINE: f64 = 70.0;
const TITLE_BASELINE_WITH_SUBTITLE: f64 = 65.0;
const SUBTITLE_BASELINE: f64 = 105.0;

/// 截取前 `limit` 条（limit 为 None 或 0 时使用全部），不改变顺序
pub fn apply_limit(participants: &[Participant], limit: Option<usize>) -> &[Participant] {
    match limit {
        Some(n) if n > 0 => &participants[..n.min(participants.len())],
        _ => participants,
    }
}

/// 排行榜图片合成器：布局 → 背景 → 标题 → 逐行绘制 → PNG
#[derive(Debug, Clone)]
pub struct ImageCompositor<S> {
    source: S,
    fetch_concurrency: usize,
    fetch_timeout: Option<Duration>,
    optimize_speed: bool,
}

impl<S: AvatarSource> ImageCompositor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            fetch_concurrency: 1,
            fetch_timeout: Some(DEFAULT_FETCH_TIMEOUT),
            optimize_speed: false,
        }
    }

    pub fn from_config(source: S, cfg: &ImageRenderConfig) -> Self {
        Self::new(source)
            .with_fetch_concurrency(cfg.avatar_concurrency)
            .with_fetch_timeout(cfg.avatar_timeout())
            .with_optimize_speed(cfg.optimize_speed)
    }

    /// 头像并发拉取数；1 表示逐行顺序拉取。绘制顺序始终与参与者顺序一致。
    pub fn with_fetch_concurrency(mut self, n: usize) -> Self {
        self.fetch_concurrency = n.max(1);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_optimize_speed(mut self, fast: bool) -> Self {
        self.optimize_speed = fast;
        self
    }

    /// 渲染为 PNG 字节
    pub async fn render(
        &self,
        participants: &[Participant],
        limit: Option<usize>,
        config: &RenderConfig,
    ) -> Result<Vec<u8>, AppError> {
        let t0 = std::time::Instant::now();
        let svg = self.compose_svg(participants, limit, config).await?;
        let t_compose = t0.elapsed();
        let png = render_svg_to_png_async(svg, self.optimize_speed).await?;
        tracing::info!(
            "排行榜渲染完成: 合成={:?}, 总计={:?}, 大小={} 字节",
            t_compose,
            t0.elapsed(),
            png.len()
        );
        Ok(png)
    }

    /// 生成完整 SVG 场景（不栅格化）
    pub async fn compose_svg(
        &self,
        participants: &[Participant],
        limit: Option<usize>,
        config: &RenderConfig,
    ) -> Result<String, AppError> {
        let rows = apply_limit(participants, limit);
        let layout = Layout::compute(config.has_subtitle(), rows.len());
        let mut surface = Surface::new(layout.width, layout.total_height)?;

        paint_background(
            &mut surface,
            f64::from(layout.width),
            f64::from(layout.total_height),
            &config.background,
        );
        paint_header(&mut surface, &layout, config);

        // buffered 按输入顺序产出结果：拉取可并发，绘制严格按名次顺序
        let mut avatars = stream::iter(0..rows.len())
            .map(|index| self.fetch_avatar(index, &rows[index]))
            .buffered(self.fetch_concurrency)
            .enumerate();

        while let Some((index, avatar)) = avatars.next().await {
            paint_row(
                &mut surface,
                &layout,
                index,
                &rows[index],
                config,
                avatar.as_deref(),
            );
        }

        Ok(surface.finish())
    }

    /// 拉取单行头像；失败仅记录日志，该行不绘制头像
    async fn fetch_avatar(&self, index: usize, participant: &Participant) -> Option<String> {
        match load_avatar(
            &self.source,
            &participant.avatar_url,
            AVATAR_DECODE_SIZE,
            self.fetch_timeout,
            self.optimize_speed,
        )
        .await
        {
            Ok(uri) => {
                tracing::debug!("第 {} 行头像加载完成", index + 1);
                Some(uri)
            }
            Err(e) => {
                tracing::warn!(
                    "第 {} 行（{}）头像加载失败，跳过头像: {}",
                    index + 1,
                    participant.nickname,
                    e
                );
                None
            }
        }
    }
}

/// 标题与副标题居中绘制，带投影；绘制完成后清除投影
fn paint_header(surface: &mut Surface, layout: &Layout, config: &RenderConfig) {
    let center_x = f64::from(layout.width) / 2.0;
    let shadow = DropShadow {
        dx: 0.0,
        dy: 2.0,
        blur: 10.0,
        color: "#000000".to_string(),
        opacity: 0.5,
    };
    surface.set_shadow(Some(&shadow));

    let title_font = FontSpec::resolve(
        config.fonts.get(FontSlot::Title),
        FontSlot::Title.default_style(),
    );
    let title_y = if config.has_subtitle() {
        TITLE_BASELINE_WITH_SUBTITLE
    } else {
        TITLE_BASELINE
    };
    surface.fill_text(
        &config.title,
        center_x,
        title_y,
        &title_font,
        TITLE_COLOR,
        TextAnchor::Middle,
    );

    if let Some(subtitle) = &config.subtitle {
        let subtitle_font = FontSpec::resolve(
            config.fonts.get(FontSlot::Subtitle),
            FontSlot::Subtitle.default_style(),
        );
        surface.fill_text(
            subtitle,
            center_x,
            SUBTITLE_BASELINE,
            &subtitle_font,
            SUBTITLE_COLOR,
            TextAnchor::Middle,
        );
    }

    surface.set_shadow(None);
}

/// 使用全局配置与默认头像来源渲染排行榜
pub async fn render_leaderboard(
    participants: &[Participant],
    limit: Option<usize>,
    config: &RenderConfig,
) -> Result<Vec<u8>, AppError> {
    let image_cfg = &AppConfig::global().image;
    let source = HttpAvatarSource::from_config(image_cfg)?;
    ImageCompositor::from_config(source, image_cfg)
        .render(participants, limit, config)
        .await
}
