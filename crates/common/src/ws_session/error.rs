/// 会话握手错误定义

use thiserror::Error;

/// 协议违规
///
/// 两种情况都会被客户端容忍接受，只作为诊断信息上报
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolViolation {
    /// 同一连接上收到了多次身份响应
    #[error("重复的身份响应")]
    DuplicateIdentification,

    /// 身份响应之前收到了日志消息
    #[error("身份确认前收到日志消息")]
    MessageBeforeIdentification,
}

/// 会话错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// 通道无法打开或意外断开
    #[error("连接错误: {0}")]
    Connection(String),

    /// 入站数据不是合法 JSON 或缺少预期字段
    #[error("解析错误: {0}")]
    Parse(String),

    /// 已有活动连接
    #[error("会话已启动")]
    AlreadyStarted,
}

impl SessionError {
    /// 连接错误
    pub fn connection(err: impl std::fmt::Display) -> Self {
        Self::Connection(err.to_string())
    }

    /// 解析错误
    pub fn parse(err: impl std::fmt::Display) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err)
    }
}
