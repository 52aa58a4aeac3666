/// DFO 会话 - 客户端
/// 
/// 连接到会话服务端，完成身份握手并记录服务端推送的消息

pub mod channel;
pub mod client;
pub mod config;
pub mod session;

pub use channel::{Channel, ChannelEvent, Connector, WsConnector};
pub use client::SessionClient;
pub use session::{ConnectionState, EnvelopeOutcome, MessageLog, SessionState, SessionToken};
