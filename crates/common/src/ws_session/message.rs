/// 会话握手消息定义

use super::SessionError;
use serde::{Deserialize, Serialize};

/// 客户端请求身份时使用的标签
pub const TAG_GET_ID: &str = "getId";

/// 服务端身份响应使用的标签
pub const TAG_CONNECTION: &str = "connection";

/// 服务端普通日志消息使用的标签
pub const TAG_MESSAGE: &str = "message";

/// 身份请求携带的消息内容
pub const HANDSHAKE_GREETING: &str = "connected";

/// 线上信封
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    /// 消息类型标签
    #[serde(rename = "type")]
    pub kind: String,

    /// 会话令牌（仅身份响应）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// 消息负载，兼容旧服务端的 `data` 字段
    #[serde(default, alias = "data", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    /// 创建身份请求 `{type: "getId", message: "connected"}`
    pub fn identify_request() -> Self {
        Self {
            kind: TAG_GET_ID.to_string(),
            token: None,
            message: Some(HANDSHAKE_GREETING.to_string()),
        }
    }

    /// 创建身份响应
    pub fn identification(token: impl Into<String>) -> Self {
        Self {
            kind: TAG_CONNECTION.to_string(),
            token: Some(token.into()),
            message: None,
        }
    }

    /// 创建日志消息
    pub fn log(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            token: None,
            message: Some(message.into()),
        }
    }

    /// 是否为身份请求
    pub fn is_identify_request(&self) -> bool {
        self.kind == TAG_GET_ID && self.token.is_none()
    }

    /// 序列化为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// 从 JSON 字符串反序列化
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// 按标签分类后的入站信封
///
/// 每个信封只有一种解释：要么是令牌，要么是日志条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEnvelope {
    /// 身份响应
    Identification { token: String },

    /// 日志消息
    Log { kind: String, message: String },
}

impl InboundEnvelope {
    /// 解析并分类原始文本
    pub fn parse(raw: &str) -> Result<Self, SessionError> {
        Self::try_from(Envelope::from_json(raw)?)
    }

    /// 是否为身份标签
    pub fn is_identification_tag(kind: &str) -> bool {
        kind == TAG_CONNECTION || kind == TAG_GET_ID
    }
}

impl TryFrom<Envelope> for InboundEnvelope {
    type Error = SessionError;

    fn try_from(envelope: Envelope) -> Result<Self, Self::Error> {
        if Self::is_identification_tag(&envelope.kind) {
            let token = envelope.token.ok_or_else(|| {
                SessionError::Parse(format!("身份响应缺少 token 字段: type={}", envelope.kind))
            })?;
            return Ok(Self::Identification { token });
        }

        let message = envelope.message.ok_or_else(|| {
            SessionError::Parse(format!("日志消息缺少 message 字段: type={}", envelope.kind))
        })?;
        Ok(Self::Log {
            kind: envelope.kind,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identify_request_wire_format() {
        let json = Envelope::identify_request().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, json!({"type": "getId", "message": "connected"}));
        assert!(Envelope::identify_request().is_identify_request());
    }

    #[test]
    fn test_parse_identification_tags() {
        let parsed = InboundEnvelope::parse(r#"{"type":"connection","token":"abc123"}"#).unwrap();
        assert_eq!(parsed, InboundEnvelope::Identification { token: "abc123".to_string() });

        let parsed = InboundEnvelope::parse(r#"{"type":"getId","token":"xyz"}"#).unwrap();
        assert_eq!(parsed, InboundEnvelope::Identification { token: "xyz".to_string() });
    }

    #[test]
    fn test_parse_log_message() {
        let parsed = InboundEnvelope::parse(r#"{"type":"chat","message":"a"}"#).unwrap();
        assert_eq!(
            parsed,
            InboundEnvelope::Log { kind: "chat".to_string(), message: "a".to_string() }
        );
    }

    #[test]
    fn test_log_message_with_token_is_still_log() {
        // 旧服务端的欢迎消息同时带有 token 和 data
        let raw = r#"{"type":"message","data":"Welcome","token":"42"}"#;
        let parsed = InboundEnvelope::parse(raw).unwrap();
        assert_eq!(
            parsed,
            InboundEnvelope::Log { kind: "message".to_string(), message: "Welcome".to_string() }
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(InboundEnvelope::parse("not json"), Err(SessionError::Parse(_))));
        assert!(matches!(
            InboundEnvelope::parse(r#"{"message":"no tag"}"#),
            Err(SessionError::Parse(_))
        ));
        assert!(matches!(
            InboundEnvelope::parse(r#"{"type":"connection"}"#),
            Err(SessionError::Parse(_))
        ));
        assert!(matches!(
            InboundEnvelope::parse(r#"{"type":"chat"}"#),
            Err(SessionError::Parse(_))
        ));
    }
}
