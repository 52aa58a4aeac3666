/// 双工消息通道抽象
/// 
/// 会话客户端只依赖这里的 trait，真实的 WebSocket 与内存测试替身都实现它们

pub mod memory;
pub mod websocket;

use async_trait::async_trait;
use common::SessionError;

pub use memory::{MemoryChannel, MemoryConnector, MemoryPeer};
pub use websocket::{WsChannel, WsConnector};

/// 通道事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// 收到一条文本消息
    Message(String),

    /// 对端正常关闭（可能带原因）
    Closed(Option<String>),

    /// 传输层故障
    Failed(String),
}

/// 已打开的双工通道
#[async_trait]
pub trait Channel: Send {
    /// 发送一条文本消息
    async fn send(&mut self, text: String) -> Result<(), SessionError>;

    /// 等待下一个事件
    ///
    /// 返回 `Closed`/`Failed` 之后不应再被调用
    async fn recv(&mut self) -> ChannelEvent;

    /// 关闭通道，重复关闭不报错
    async fn close(&mut self) -> Result<(), SessionError>;
}

/// 通道建立器
///
/// `connect` 成功返回即视为通道已打开
#[async_trait]
pub trait Connector: Send + Sync {
    type Channel: Channel + 'static;

    async fn connect(&self, url: &str) -> Result<Self::Channel, SessionError>;
}
