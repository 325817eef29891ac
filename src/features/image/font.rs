use super::surface::escape_xml;

/// 字形样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique,
}

/// 从 CSS `font` 简写解析出的字体描述
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub style: FontStyle,
    pub weight: u16,
    /// 像素
    pub size: f64,
    /// 原样保留的字体族列表，如 `"Noto Sans", sans-serif`
    pub family: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            style: FontStyle::Normal,
            weight: 400,
            size: 16.0,
            family: "sans-serif".to_string(),
        }
    }
}

impl FontSpec {
    /// 解析 `[style] [variant] [weight] <size>[/<line-height>] <family>`。
    ///
    /// 字号仅支持 px / pt；缺少字号或字体族时返回 None。
    pub fn parse(input: &str) -> Option<Self> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        let mut spec = FontSpec::default();

        for (i, token) in tokens.iter().enumerate() {
            if let Some(size) = parse_size(token) {
                let family = tokens[i + 1..].join(" ");
                if family.is_empty() || size <= 0.0 {
                    return None;
                }
                spec.size = size;
                spec.family = family;
                return Some(spec);
            }

            match token.to_ascii_lowercase().as_str() {
                "normal" | "small-caps" => {}
                "italic" => spec.style = FontStyle::Italic,
                "oblique" => spec.style = FontStyle::Oblique,
                "bold" => spec.weight = 700,
                "bolder" => spec.weight = 900,
                "lighter" => spec.weight = 300,
                other => match other.parse::<u16>() {
                    Ok(w) if (1..=1000).contains(&w) => spec.weight = w,
                    _ if is_stretch_keyword(other) => {}
                    _ => return None,
                },
            }
        }
        None
    }

    /// 解析 `style`，失败时依次退回 `fallback` 与内置默认值
    pub fn resolve(style: &str, fallback: &str) -> Self {
        Self::parse(style)
            .or_else(|| {
                tracing::debug!("字体字符串无法解析 '{}'，使用默认值 '{}'", style, fallback);
                Self::parse(fallback)
            })
            .unwrap_or_default()
    }

    /// 写出 SVG 文本元素的字体属性（以空格开头）
    pub fn write_svg_attrs(&self, out: &mut String) {
        let style = match self.style {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
            FontStyle::Oblique => "oblique",
        };
        out.push_str(&format!(
            r#" font-family="{}" font-size="{}" font-weight="{}" font-style="{}""#,
            escape_xml(&self.family),
            self.size,
            self.weight,
            style,
        ));
    }
}

fn parse_size(token: &str) -> Option<f64> {
    let size = token.split('/').next()?;
    if let Some(px) = size.strip_suffix("px") {
        px.parse::<f64>().ok()
    } else if let Some(pt) = size.strip_suffix("pt") {
        pt.parse::<f64>().ok().map(|v| v * 4.0 / 3.0)
    } else {
        None
    }
}

fn is_stretch_keyword(token: &str) -> bool {
    matches!(
        token,
        "ultra-condensed"
            | "extra-condensed"
            | "condensed"
            | "semi-condensed"
            | "semi-expanded"
            | "expanded"
            | "extra-expanded"
            | "ultra-expanded"
    )
}
