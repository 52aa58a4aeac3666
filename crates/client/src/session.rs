/// 会话状态
/// 
/// 连接状态、会话令牌与消息日志，以及把入站信封翻译为状态变化的规则

use common::ws_session::{Envelope, InboundEnvelope, ProtocolViolation, SessionError};
use std::fmt;
use tracing::{debug, info, warn};

/// 连接状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    /// 未启动或已关闭
    #[default]
    Closed,
}

/// 服务端分配的会话令牌
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for SessionToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// 按到达顺序记录的消息日志（只追加）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog(Vec<String>);

impl MessageLog {
    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    fn push(&mut self, entry: String) {
        self.0.push(entry);
    }
}

/// 处理一条入站信封的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeOutcome {
    /// 令牌已保存
    TokenAssigned {
        token: SessionToken,
        violation: Option<ProtocolViolation>,
    },

    /// 日志已追加
    Logged {
        kind: String,
        violation: Option<ProtocolViolation>,
    },

    /// 连接未打开，信封被忽略
    Ignored,
}

/// 会话客户端对外暴露的状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub connection: ConnectionState,
    pub token: Option<SessionToken>,
    pub log: MessageLog,
    /// 最近一次连接故障
    pub last_error: Option<String>,
}

impl SessionState {
    /// 新连接开始：清空上一次连接的令牌与日志
    pub(crate) fn connecting(&mut self) {
        *self = Self {
            connection: ConnectionState::Connecting,
            ..Self::default()
        };
    }

    /// 通道已打开，返回需要立即发送的身份请求
    pub(crate) fn opened(&mut self) -> Envelope {
        self.connection = ConnectionState::Open;
        Envelope::identify_request()
    }

    /// 处理一条原始入站消息
    ///
    /// 格式错误返回 `SessionError::Parse`，状态保持不变
    pub fn handle_raw(&mut self, raw: &str) -> Result<EnvelopeOutcome, SessionError> {
        if self.connection != ConnectionState::Open {
            debug!("连接未打开，忽略入站消息");
            return Ok(EnvelopeOutcome::Ignored);
        }

        match InboundEnvelope::parse(raw)? {
            InboundEnvelope::Identification { token } => {
                let token = SessionToken::new(token);
                let violation = match self.token.replace(token.clone()) {
                    Some(previous) => {
                        warn!("重复的身份响应，覆盖旧令牌: {} -> {}", previous, token);
                        Some(ProtocolViolation::DuplicateIdentification)
                    }
                    None => {
                        info!("✅ 会话令牌: {}", token);
                        None
                    }
                };
                Ok(EnvelopeOutcome::TokenAssigned { token, violation })
            }
            InboundEnvelope::Log { kind, message } => {
                let violation = if self.token.is_none() {
                    debug!("身份确认前收到日志消息: type={}", kind);
                    Some(ProtocolViolation::MessageBeforeIdentification)
                } else {
                    None
                };
                info!("{}", message);
                self.log.push(message);
                Ok(EnvelopeOutcome::Logged { kind, violation })
            }
        }
    }

    /// 标记连接关闭；已关闭时返回 false
    pub(crate) fn close(&mut self, error: Option<String>) -> bool {
        if self.connection == ConnectionState::Closed {
            return false;
        }
        self.connection = ConnectionState::Closed;
        if error.is_some() {
            self.last_error = error;
        }
        true
    }

    /// 连接失败
    pub(crate) fn failed(&mut self, error: String) {
        self.connection = ConnectionState::Closed;
        self.last_error = Some(error);
    }
}
