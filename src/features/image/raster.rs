use resvg::usvg::{self, Options as UsvgOptions};
use resvg::render;
use resvg::tiny_skia::{Pixmap, Transform};
use tokio::task::spawn_blocking;

use crate::error::AppError;

use super::fonts::get_global_font_db;

/// 未指定字体族或字体族不可用时的回退
const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// 将 SVG 栅格化为像素图（画布分配失败或 SVG 解析失败均为致命错误）
pub fn rasterize(svg_data: &str, optimize_speed: bool) -> Result<Pixmap, AppError> {
    let font_db = get_global_font_db()?;

    let opts = UsvgOptions {
        resources_dir: None,
        fontdb: font_db,
        font_family: DEFAULT_FONT_FAMILY.to_string(),
        font_size: 16.0,
        shape_rendering: if optimize_speed {
            usvg::ShapeRendering::OptimizeSpeed
        } else {
            usvg::ShapeRendering::GeometricPrecision
        },
        text_rendering: if optimize_speed {
            usvg::TextRendering::OptimizeSpeed
        } else {
            usvg::TextRendering::OptimizeLegibility
        },
        image_rendering: if optimize_speed {
            usvg::ImageRendering::OptimizeSpeed
        } else {
            usvg::ImageRendering::OptimizeQuality
        },
        ..Default::default()
    };

    let tree = usvg::Tree::from_data(svg_data.as_bytes(), &opts)
        .map_err(|e| AppError::ImageRendererError(format!("Failed to parse SVG: {e}")))?;

    let size = tree.size().to_int_size();
    let mut pixmap = Pixmap::new(size.width(), size.height())
        .ok_or_else(|| AppError::ImageRendererError("Failed to create pixmap".to_string()))?;

    render(&tree, Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// 将像素图编码为 PNG（RGBA8）
pub fn encode_png(pixmap: &Pixmap, optimize_speed: bool) -> Result<Vec<u8>, AppError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    // tiny-skia 存储的是预乘 alpha，编码前需还原
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut out = Vec::with_capacity(rgba.len() / 2);
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        if optimize_speed {
            encoder.set_compression(png::Compression::Fast);
            encoder.set_filter(png::FilterType::NoFilter);
        } else {
            encoder.set_compression(png::Compression::Default);
            encoder.set_filter(png::FilterType::Paeth);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| AppError::ImageRendererError(format!("PNG write_header error: {e}")))?;
        writer.write_image_data(&rgba).map_err(|e| {
            AppError::ImageRendererError(format!("PNG write_image_data error: {e}"))
        })?;
        writer
            .finish()
            .map_err(|e| AppError::ImageRendererError(format!("PNG finish error: {e}")))?;
    }
    Ok(out)
}

/// SVG → PNG
pub fn render_svg_to_png(svg_data: &str, optimize_speed: bool) -> Result<Vec<u8>, AppError> {
    let t0 = std::time::Instant::now();
    let pixmap = rasterize(svg_data, optimize_speed)?;
    let t_raster = t0.elapsed();
    let out = encode_png(&pixmap, optimize_speed)?;
    let t_encode = t0.elapsed();

    tracing::info!(
        "PNG渲染内部分段: 栅格化={:?}, 编码={:?}, 总计={:?}",
        t_raster,
        t_encode - t_raster,
        t_encode
    );
    Ok(out)
}

/// 异步版本：将解析、栅格化与编码放入 Tokio 阻塞线程池，避免阻塞异步运行时线程。
pub async fn render_svg_to_png_async(
    svg_data: String,
    optimize_speed: bool,
) -> Result<Vec<u8>, AppError> {
    spawn_blocking(move || render_svg_to_png(&svg_data, optimize_speed))
        .await
        .map_err(|e| AppError::Internal(format!("阻塞渲染任务执行失败: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::{rasterize, render_svg_to_png};

    #[test]
    fn rasterize_keeps_svg_dimensions() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="20"><rect width="30" height="20" fill="#00ff00"/></svg>"##;
        let pixmap = rasterize(svg, false).expect("rasterize");
        assert_eq!((pixmap.width(), pixmap.height()), (30, 20));
        let px = pixmap.pixel(10, 10).expect("pixel");
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (0, 255, 0, 255));
    }

    #[test]
    fn invalid_svg_is_fatal() {
        assert!(render_svg_to_png("<svg", false).is_err());
    }

    #[test]
    fn png_output_has_signature() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"></svg>"#;
        let png = render_svg_to_png(svg, true).expect("render");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
