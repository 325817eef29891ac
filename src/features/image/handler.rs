use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::IntoResponse,
    routing::post,
};

use crate::error::AppError;
use crate::features::leaderboard::LeaderboardBuilder;
use crate::state::AppState;

use super::types::RenderLeaderboardRequest;

/// 生成排行榜 PNG
///
/// 参与者数量超过上限返回 422；单行头像失败不影响整体出图。
pub async fn render_leaderboard_image(
    State(state): State<AppState>,
    Json(req): Json<RenderLeaderboardRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.participants.len() > state.max_participants {
        return Err(AppError::Validation(format!(
            "参与者数量 {} 超过上限 {}",
            req.participants.len(),
            state.max_participants
        )));
    }

    let config = LeaderboardBuilder::from_options(req.options).build();

    let t_wait = Instant::now();
    let _permit = state
        .render_semaphore
        .clone()
        .acquire_owned()
        .await
        .map_err(|e| AppError::Internal(format!("获取渲染信号量失败: {e}")))?;
    tracing::debug!("渲染信号量获取完成，等待 {:?}", t_wait.elapsed());

    let png = state
        .compositor
        .render(&req.participants, req.limit, &config)
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok((headers, Bytes::from(png)))
}

pub fn create_image_router() -> Router<AppState> {
    Router::new().route("/image/leaderboard", post(render_leaderboard_image))
}
