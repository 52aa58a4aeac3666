/// DFO 会话客户端
/// 
/// 连接 Server，打印分配到的会话令牌与收到的消息，Ctrl-C 退出

use client::{config, ConnectionState, SessionClient, WsConnector};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置
    dotenvy::dotenv().ok();
    let cfg = config::Config::from_env()?;

    // 初始化日志
    // 可以通过环境变量 RUST_LOG 设置日志级别，例如：
    // RUST_LOG=client=debug cargo run --bin dfo-client
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level))
        )
        .init();

    info!("🚀 启动 DFO 会话客户端...");

    let mut session = SessionClient::new(cfg.server_ws_url.clone());
    info!("🎯 会话端点: {}", session.server_url());
    let mut updates = session.subscribe();
    session.start(&WsConnector).await?;

    let mut printed = 0;
    let mut token = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("收到退出信号");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if state.token != token {
                    if let Some(t) = &state.token {
                        info!("📌 会话令牌: {}", t);
                    }
                    token = state.token.clone();
                }
                for entry in state.log.iter().skip(printed) {
                    println!("{}", entry);
                }
                printed = state.log.len();

                if state.connection == ConnectionState::Closed {
                    if let Some(e) = &state.last_error {
                        warn!("连接已断开: {}", e);
                    }
                    break;
                }
            }
        }
    }

    session.stop().await;
    info!("客户端已退出");
    Ok(())
}
