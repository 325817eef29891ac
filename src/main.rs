use rankboard::app::build_router;
use rankboard::features::image::prewarm_fonts;
use rankboard::state::AppState;
use rankboard::{ShutdownManager, config::AppConfig};

#[tokio::main]
async fn main() {
    // 配置需先于日志初始化读取，以便使用配置中的默认日志级别
    if let Err(e) = AppConfig::init_global() {
        eprintln!("Config init failed: {e}");
        std::process::exit(1);
    }
    let config = AppConfig::global();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .init();

    let shutdown_manager = ShutdownManager::new();
    if let Err(e) = shutdown_manager.start_signal_handler() {
        tracing::error!("信号处理器启动失败: {}", e);
        std::process::exit(1);
    }

    // 字体扫描较慢，放到阻塞线程池中完成
    if let Err(e) = tokio::task::spawn_blocking(prewarm_fonts).await {
        tracing::warn!("字体预热任务失败: {}", e);
    }

    let app_state = match AppState::from_config(&config.image) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("应用状态初始化失败: {}", e);
            std::process::exit(1);
        }
    };
    let app = build_router(app_state, config);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Bind address failed {}: {}", addr, e);
            std::process::exit(1);
        });

    tracing::info!("Server: http://{}", addr);
    tracing::info!("Health: http://{}/health", addr);
    tracing::info!(
        "Leaderboard API: http://{}{}/image/leaderboard",
        addr,
        config.api.prefix
    );

    let graceful = axum::serve(listener, app).with_graceful_shutdown(async move {
        let reason = shutdown_manager.wait_for_shutdown().await;
        tracing::info!("接收到退出信号: {:?}，开始优雅关闭HTTP服务器...", reason);
    });

    if let Err(e) = graceful.await {
        tracing::error!("服务器运行错误: {}", e);
        std::process::exit(1);
    }

    tracing::info!("服务器已优雅关闭");
}
