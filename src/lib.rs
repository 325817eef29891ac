/// 统一错误处理模块
pub mod error;

/// 配置模块
pub mod config;

/// 功能聚合模块
pub mod features;

/// 应用状态聚合模块
pub mod state;

/// 路由组装
pub mod app;

/// HTTP Client 复用工具
pub mod http;

/// CORS 中间件构建
pub mod cors;

/// 优雅退出
pub mod shutdown;

// 导出常用类型供外部使用
pub use config::AppConfig;
pub use error::AppError;
pub use features::image::{
    AvatarSource, HttpAvatarSource, ImageCompositor, register_font_data, register_font_file,
    render_leaderboard,
};
pub use features::leaderboard::{
    BackgroundSpec, GradientKind, LeaderboardBuilder, LeaderboardOptions, Participant, RankTier,
    RenderConfig,
};
pub use shutdown::{ShutdownManager, ShutdownReason};
