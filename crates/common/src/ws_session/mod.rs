/// WebSocket 会话握手模块
/// 
/// 定义客户端与服务端之间的会话握手协议：信封格式、标签常量、帧编解码与错误类型

pub mod codec;
pub mod error;
pub mod message;

pub use error::{ProtocolViolation, SessionError};
pub use message::{
    Envelope, InboundEnvelope, HANDSHAKE_GREETING, TAG_CONNECTION, TAG_GET_ID, TAG_MESSAGE,
};
