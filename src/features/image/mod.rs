pub mod avatar;
pub mod background;
pub mod compositor;
pub mod font;
mod fonts;
pub mod handler;
pub mod layout;
pub mod raster;
pub mod row;
pub mod surface;
mod types;

/// 启动期预热字体数据库，降低首个渲染请求的长尾延迟
pub fn prewarm_fonts() {
    if let Err(e) = fonts::get_global_font_db() {
        tracing::warn!("字体数据库预热失败: {}", e);
    }
}

pub use avatar::{AvatarSource, HttpAvatarSource};
pub use compositor::{ImageCompositor, render_leaderboard};
pub use fonts::{register_font_data, register_font_file};
pub use handler::create_image_router;
pub use types::RenderLeaderboardRequest;
