/// 配置管理

use serde::Deserialize;

/// 默认的会话 WebSocket 端点
pub const DEFAULT_SERVER_WS_URL: &str = "ws://localhost:5000/api/v1/session/ws";

/// 环境变量前缀，例如 `DFO_CLIENT_SERVER_WS_URL`
const ENV_PREFIX: &str = "DFO_CLIENT";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server_ws_url: String,
    pub log_level: String,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_source(env: config::Environment) -> anyhow::Result<Self> {
        let cfg = config::Config::builder()
            .set_default("server_ws_url", DEFAULT_SERVER_WS_URL)?
            .set_default("log_level", "debug")?
            .add_source(env)
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }
}
