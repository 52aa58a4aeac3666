/// 配置管理

use common::{Error, Result};
use serde::Deserialize;

/// 环境变量前缀，例如 `DFO_SERVER_SERVER_PORT`
const ENV_PREFIX: &str = "DFO_SERVER";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server_port: u16,
    pub api_prefix: String,
    pub log_level: String,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn from_source(env: config::Environment) -> Result<Self> {
        Self::build(env).map_err(|e| Error::Config(e.to_string()))
    }

    fn build(env: config::Environment) -> std::result::Result<Self, config::ConfigError> {
        let mut cfg: Self = config::Config::builder()
            .set_default("server_port", 5000_i64)?
            .set_default("api_prefix", "/api/v1")?
            .set_default("log_level", "debug")?
            .add_source(env)
            .build()?
            .try_deserialize()?;
        cfg.api_prefix = common::utils::normalize_prefix(&cfg.api_prefix);
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::from_source(env(&[])).unwrap();
        assert_eq!(cfg.server_port, 5000);
        assert_eq!(cfg.api_prefix, "/api/v1");
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn test_env_overrides() {
        let cfg = Config::from_source(env(&[
            ("DFO_SERVER_SERVER_PORT", "8000"),
            ("DFO_SERVER_LOG_LEVEL", "info"),
        ]))
        .unwrap();
        assert_eq!(cfg.server_port, 8000);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_api_prefix_is_normalized() {
        let cfg = Config::from_source(env(&[("DFO_SERVER_API_PREFIX", "api/v1/")])).unwrap();
        assert_eq!(cfg.api_prefix, "/api/v1");

        let cfg = Config::from_source(env(&[("DFO_SERVER_API_PREFIX", "/")])).unwrap();
        assert_eq!(cfg.api_prefix, "");
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_source(env(&[("DFO_SERVER_SERVER_PORT", "not-a-port")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
