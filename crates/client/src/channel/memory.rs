/// 内存通道
/// 
/// 进程内的确定性通道，`MemoryPeer` 扮演服务端，用于测试与演示

use super::{Channel, ChannelEvent, Connector};
use async_trait::async_trait;
use common::SessionError;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// 客户端一侧的内存通道
pub struct MemoryChannel {
    inbound: mpsc::UnboundedReceiver<String>,
    outbound: mpsc::UnboundedSender<String>,
    closed: bool,
}

/// 服务端一侧的句柄
pub struct MemoryPeer {
    to_client: Option<mpsc::UnboundedSender<String>>,
    from_client: mpsc::UnboundedReceiver<String>,
}

impl MemoryChannel {
    /// 创建一对相连的通道与对端
    pub fn pair() -> (Self, MemoryPeer) {
        let (to_client, inbound) = mpsc::unbounded_channel();
        let (outbound, from_client) = mpsc::unbounded_channel();

        let channel = Self {
            inbound,
            outbound,
            closed: false,
        };
        let peer = MemoryPeer {
            to_client: Some(to_client),
            from_client,
        };
        (channel, peer)
    }
}

#[async_trait]
impl Channel for MemoryChannel {
    async fn send(&mut self, text: String) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Connection("连接已关闭".to_string()));
        }
        self.outbound
            .send(text)
            .map_err(|_| SessionError::Connection("对端已断开".to_string()))
    }

    async fn recv(&mut self) -> ChannelEvent {
        if self.closed {
            return ChannelEvent::Closed(None);
        }
        match self.inbound.recv().await {
            Some(text) => ChannelEvent::Message(text),
            None => {
                self.closed = true;
                ChannelEvent::Closed(None)
            }
        }
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.closed = true;
        self.inbound.close();
        Ok(())
    }
}

impl MemoryPeer {
    /// 向客户端发送原始文本，客户端已关闭时返回 false
    pub fn send(&self, text: impl Into<String>) -> bool {
        match &self.to_client {
            Some(tx) => tx.send(text.into()).is_ok(),
            None => false,
        }
    }

    /// 等待客户端发来的下一条消息，客户端关闭后返回 None
    pub async fn recv(&mut self) -> Option<String> {
        self.from_client.recv().await
    }

    /// 模拟服务端主动断开
    pub fn disconnect(&mut self) {
        self.to_client = None;
    }
}

/// 一次性的内存连接器
///
/// 第一次 `connect` 交出预先创建的通道，之后的调用视为连接被拒绝
pub struct MemoryConnector {
    channel: Mutex<Option<MemoryChannel>>,
}

impl MemoryConnector {
    /// 创建连接器及其对端
    pub fn pair() -> (Self, MemoryPeer) {
        let (channel, peer) = MemoryChannel::pair();
        let connector = Self {
            channel: Mutex::new(Some(channel)),
        };
        (connector, peer)
    }

    /// 总是拒绝连接的连接器
    pub fn refusing() -> Self {
        Self {
            channel: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    type Channel = MemoryChannel;

    async fn connect(&self, url: &str) -> Result<Self::Channel, SessionError> {
        let channel = self
            .channel
            .lock()
            .map_err(SessionError::connection)?
            .take();
        channel.ok_or_else(|| SessionError::Connection(format!("连接被拒绝: {}", url)))
    }
}
