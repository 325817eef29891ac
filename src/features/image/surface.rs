use crate::error::AppError;

use super::font::FontSpec;

/// XML 转义（文本内容与属性值共用）
pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// 填充/描边所用的颜料
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Color { color: String, opacity: f64 },
    /// 指向 `<defs>` 中已定义的渐变
    Gradient(String),
}

impl Paint {
    pub fn color(color: &str) -> Self {
        Paint::Color {
            color: color.to_string(),
            opacity: 1.0,
        }
    }

    pub fn color_alpha(color: &str, opacity: f64) -> Self {
        Paint::Color {
            color: color.to_string(),
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    fn write_attrs(&self, out: &mut String, attr: &str) {
        match self {
            Paint::Color { color, opacity } => {
                out.push_str(&format!(r#" {attr}="{}""#, escape_xml(color)));
                if *opacity < 1.0 {
                    out.push_str(&format!(r#" {attr}-opacity="{opacity}""#));
                }
            }
            Paint::Gradient(id) => {
                out.push_str(&format!(r#" {attr}="url(#{id})""#));
            }
        }
    }
}

/// 渐变色标
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
    pub opacity: f64,
}

impl GradientStop {
    pub fn new(offset: f64, color: &str) -> Self {
        Self {
            offset,
            color: color.to_string(),
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// 文本水平对齐
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_svg(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// 投影参数（语义对应 canvas 的 shadowOffset/shadowBlur/shadowColor）
#[derive(Debug, Clone, PartialEq)]
pub struct DropShadow {
    pub dx: f64,
    pub dy: f64,
    pub blur: f64,
    pub color: String,
    pub opacity: f64,
}

/// 以 SVG 场景为后端的绘图表面。
///
/// 与 canvas 一样维护全局透明度与投影状态，设置后作用于之后绘制的每个元素，
/// 直到显式恢复；元素按调用顺序叠放，后绘制者在上。
#[derive(Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    defs: String,
    body: String,
    next_id: usize,
    global_alpha: f64,
    shadow_filter: Option<String>,
}

impl Surface {
    /// 创建指定尺寸的表面；任一维度为 0 视为分配失败
    pub fn new(width: u32, height: u32) -> Result<Self, AppError> {
        if width == 0 || height == 0 {
            return Err(AppError::ImageRendererError(format!(
                "无法分配 {width}x{height} 的画布"
            )));
        }
        Ok(Self {
            width,
            height,
            defs: String::with_capacity(2048),
            body: String::with_capacity(16 * 1024),
            next_id: 0,
            global_alpha: 1.0,
            shadow_filter: None,
        })
    }

    pub fn global_alpha(&self) -> f64 {
        self.global_alpha
    }

    pub fn set_global_alpha(&mut self, alpha: f64) {
        self.global_alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    pub fn has_shadow(&self) -> bool {
        self.shadow_filter.is_some()
    }

    /// 设置或清除投影（None 清除）
    pub fn set_shadow(&mut self, shadow: Option<&DropShadow>) {
        let Some(s) = shadow else {
            self.shadow_filter = None;
            return;
        };
        let id = self.alloc_id("shadow");
        self.defs.push_str(&format!(
            r#"<filter id="{id}" x="-20%" y="-20%" width="140%" height="140%"><feDropShadow dx="{}" dy="{}" stdDeviation="{}" flood-color="{}" flood-opacity="{}"/></filter>"#,
            s.dx,
            s.dy,
            s.blur / 2.0,
            escape_xml(&s.color),
            s.opacity,
        ));
        self.shadow_filter = Some(id);
    }

    fn alloc_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn write_stops(&mut self, stops: &[GradientStop]) {
        for stop in stops {
            self.defs.push_str(&format!(
                r#"<stop offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
                stop.offset.clamp(0.0, 1.0),
                escape_xml(&stop.color),
                stop.opacity.clamp(0.0, 1.0),
            ));
        }
    }

    /// 定义线性渐变（用户坐标系）
    pub fn linear_gradient(
        &mut self,
        (x1, y1): (f64, f64),
        (x2, y2): (f64, f64),
        stops: &[GradientStop],
    ) -> Paint {
        let id = self.alloc_id("lg");
        self.defs.push_str(&format!(
            r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}">"#,
        ));
        self.write_stops(stops);
        self.defs.push_str("</linearGradient>");
        Paint::Gradient(id)
    }

    /// 定义径向渐变（用户坐标系，内圆半径为 0）
    pub fn radial_gradient(
        &mut self,
        (cx, cy): (f64, f64),
        r: f64,
        stops: &[GradientStop],
    ) -> Paint {
        let id = self.alloc_id("rg");
        self.defs.push_str(&format!(
            r#"<radialGradient id="{id}" gradientUnits="userSpaceOnUse" cx="{cx}" cy="{cy}" r="{r}" fx="{cx}" fy="{cy}">"#,
        ));
        self.write_stops(stops);
        self.defs.push_str("</radialGradient>");
        Paint::Gradient(id)
    }

    /// 附加全局状态（透明度、投影）属性
    fn write_state_attrs(&mut self) {
        if self.global_alpha < 1.0 {
            self.body.push_str(&format!(r#" opacity="{}""#, self.global_alpha));
        }
        if let Some(id) = &self.shadow_filter {
            self.body.push_str(&format!(r#" filter="url(#{id})""#));
        }
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint) {
        self.body.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}""#,
        ));
        paint.write_attrs(&mut self.body, "fill");
        self.write_state_attrs();
        self.body.push_str("/>");
    }

    pub fn fill_rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64, r: f64, paint: &Paint) {
        self.body.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{r}" ry="{r}""#,
        ));
        paint.write_attrs(&mut self.body, "fill");
        self.write_state_attrs();
        self.body.push_str("/>");
    }

    #[allow(clippy::too_many_arguments)]
    pub fn stroke_rounded_rect(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        r: f64,
        paint: &Paint,
        line_width: f64,
    ) {
        self.body.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{r}" ry="{r}" fill="none" stroke-width="{line_width}""#,
        ));
        paint.write_attrs(&mut self.body, "stroke");
        self.write_state_attrs();
        self.body.push_str("/>");
    }

    /// 在 (x, y) 处绘制文本，y 为基线位置
    pub fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font: &FontSpec,
        color: &str,
        anchor: TextAnchor,
    ) {
        self.body.push_str(&format!(
            r#"<text x="{x}" y="{y}" text-anchor="{}""#,
            anchor.as_svg(),
        ));
        font.write_svg_attrs(&mut self.body);
        Paint::color(color).write_attrs(&mut self.body, "fill");
        self.write_state_attrs();
        self.body.push_str(&format!(">{}</text>", escape_xml(text)));
    }

    /// 将图片裁剪为圆形绘制；图片按 slice 方式铺满圆的外接正方形
    pub fn draw_image_in_circle(&mut self, href: &str, cx: f64, cy: f64, r: f64) {
        let clip = self.alloc_id("clip");
        self.defs.push_str(&format!(
            r#"<clipPath id="{clip}"><circle cx="{cx}" cy="{cy}" r="{r}"/></clipPath>"#,
        ));
        self.body.push_str(&format!(
            r#"<image xlink:href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid slice" clip-path="url(#{clip})""#,
            escape_xml(href),
            cx - r,
            cy - r,
            r * 2.0,
            r * 2.0,
        ));
        self.write_state_attrs();
        self.body.push_str("/>");
    }

    /// 输出完整 SVG 文档
    pub fn finish(self) -> String {
        let mut svg = String::with_capacity(self.defs.len() + self.body.len() + 256);
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        ));
        if !self.defs.is_empty() {
            svg.push_str("<defs>");
            svg.push_str(&self.defs);
            svg.push_str("</defs>");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::{DropShadow, GradientStop, Paint, Surface, TextAnchor};
    use crate::features::image::font::FontSpec;

    #[test]
    fn zero_sized_surface_is_rejected() {
        assert!(Surface::new(0, 10).is_err());
        assert!(Surface::new(10, 0).is_err());
    }

    #[test]
    fn document_carries_canvas_size_and_defs() {
        let mut s = Surface::new(900, 240).unwrap();
        let stops = [GradientStop::new(0.0, "#000"), GradientStop::new(1.0, "#fff")];
        let paint = s.linear_gradient((0.0, 0.0), (900.0, 0.0), &stops);
        s.fill_rect(0.0, 0.0, 900.0, 240.0, &paint);
        let svg = s.finish();
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"width="900" height="240" viewBox="0 0 900 240""#));
        assert!(svg.contains(
            r##"<stop offset="0" stop-color="#000" stop-opacity="1"/><stop offset="1" stop-color="#fff" stop-opacity="1"/>"##
        ));
        let defs_end = svg.find("</defs>").expect("defs block");
        let rect = svg.find("<rect").expect("rect element");
        assert!(defs_end < rect);
        assert!(svg.contains(r#"fill="url(#lg1)""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn global_alpha_applies_until_restored() {
        let mut s = Surface::new(10, 10).unwrap();
        s.set_global_alpha(0.4);
        s.fill_rect(0.0, 0.0, 10.0, 10.0, &Paint::color("#ff0000"));
        s.set_global_alpha(1.0);
        s.fill_rect(0.0, 0.0, 5.0, 5.0, &Paint::color("#00ff00"));
        let svg = s.finish();
        assert!(svg.contains(r##"fill="#ff0000" opacity="0.4""##));
        assert!(svg.contains(r##"<rect x="0" y="0" width="5" height="5" fill="#00ff00"/>"##));
    }

    #[test]
    fn shadow_applies_to_text_until_cleared() {
        let mut s = Surface::new(100, 100).unwrap();
        let font = FontSpec::default();
        s.set_shadow(Some(&DropShadow {
            dx: 0.0,
            dy: 2.0,
            blur: 10.0,
            color: "#000000".into(),
            opacity: 0.5,
        }));
        assert!(s.has_shadow());
        s.fill_text("Title", 50.0, 40.0, &font, "#ffffff", TextAnchor::Middle);
        s.set_shadow(None);
        assert!(!s.has_shadow());
        s.fill_text("Row", 10.0, 80.0, &font, "#ffffff", TextAnchor::Start);
        let svg = s.finish();
        assert!(svg.contains(r#"stdDeviation="5""#));
        let row = svg.split("<text").nth(2).expect("second text element");
        assert!(!row.contains("filter="));
        let title = svg.split("<text").nth(1).expect("first text element");
        assert!(title.contains(r#"filter="url(#shadow1)""#));
    }

    #[test]
    fn text_and_colors_are_escaped() {
        let mut s = Surface::new(10, 10).unwrap();
        s.fill_text(
            "<b>&\"x\"",
            0.0,
            0.0,
            &FontSpec::default(),
            "red\" onload=\"x",
            TextAnchor::Start,
        );
        let svg = s.finish();
        assert!(svg.contains("&lt;b&gt;&amp;&quot;x&quot;</text>"));
        assert!(svg.contains(r#"fill="red&quot; onload=&quot;x""#));
    }

    #[test]
    fn gradients_get_unique_ids() {
        let mut s = Surface::new(10, 10).unwrap();
        let stops = [GradientStop::new(0.0, "#000"), GradientStop::new(1.0, "#fff")];
        let a = s.linear_gradient((0.0, 0.0), (10.0, 0.0), &stops);
        let b = s.radial_gradient((5.0, 5.0), 5.0, &stops);
        assert_ne!(a, b);
        let svg = s.finish();
        assert!(svg.contains("<linearGradient id=\"lg1\""));
        assert!(svg.contains("<radialGradient id=\"rg2\""));
    }

    #[test]
    fn image_is_clipped_to_circle() {
        let mut s = Surface::new(100, 100).unwrap();
        s.draw_image_in_circle("data:image/png;base64,AAAA", 50.0, 50.0, 30.0);
        let svg = s.finish();
        assert!(svg.contains(r#"<clipPath id="clip1"><circle cx="50" cy="50" r="30"/></clipPath>"#));
        assert!(svg.contains(r#"x="20" y="20" width="60" height="60""#));
        assert!(svg.contains(r#"clip-path="url(#clip1)""#));
    }
}
