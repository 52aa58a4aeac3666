/// DFO 会话 - Server
/// 
/// 服务端主程序，接受会话 WebSocket 连接并提供会话查询 API

use server::{app_state::AppState, build_router, config, ws::SessionManager};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 加载配置
    let cfg = config::Config::from_env()?;

    // 初始化日志
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level))
        )
        .init();

    info!("🚀 启动 DFO 会话 Server...");
    info!("✅ 配置加载成功");

    // 初始化会话管理器
    let session_manager = SessionManager::new();
    info!("✅ 会话管理器初始化成功");

    // 创建应用状态
    let app_state = AppState::new(session_manager);

    // 构建应用路由
    let app = build_router(app_state, &cfg.api_prefix);

    // 启动服务器
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.server_port));
    info!("🎯 服务器监听在 http://{}", addr);
    info!(
        "📌 会话端点: ws://{}{}",
        addr,
        common::utils::join_path(&cfg.api_prefix, "session/ws")
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
