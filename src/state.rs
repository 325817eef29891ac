use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::config::ImageRenderConfig;
use crate::error::AppError;
use crate::features::image::{HttpAvatarSource, ImageCompositor};

/// 聚合的应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub compositor: Arc<ImageCompositor<HttpAvatarSource>>,
    /// 控制并发渲染的信号量（限制 CPU 密集型任务数量）
    pub render_semaphore: Arc<Semaphore>,
    /// 单次请求允许的最大参与者数量
    pub max_participants: usize,
}

impl AppState {
    pub fn from_config(cfg: &ImageRenderConfig) -> Result<Self, AppError> {
        let source = HttpAvatarSource::from_config(cfg)?;
        Ok(Self {
            compositor: Arc::new(ImageCompositor::from_config(source, cfg)),
            render_semaphore: Arc::new(Semaphore::new(cfg.effective_max_parallel())),
            max_participants: cfg.max_participants,
        })
    }
}
