use axum::{Router, routing::get};

use crate::config::AppConfig;
use crate::cors::build_cors_layer;
use crate::features::{health::health_check, image::create_image_router};
use crate::state::AppState;

/// 组装完整路由：`/health` + `{api.prefix}` 下的业务接口，按配置挂载 CORS
pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let api_router = Router::<AppState>::new().merge(create_image_router());

    let mut app = Router::<AppState>::new()
        .route("/health", get(health_check))
        .nest(&config.api.prefix, api_router)
        .with_state(state);

    if let Some(cors) = build_cors_layer(&config.cors) {
        app = app.layer(cors);
    }
    app
}
