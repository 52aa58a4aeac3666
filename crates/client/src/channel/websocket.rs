/// 基于 tokio-tungstenite 的 WebSocket 通道

use super::{Channel, ChannelEvent, Connector};
use async_trait::async_trait;
use common::ws_session::codec::{self, Frame};
use common::SessionError;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

/// WebSocket 连接器
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    type Channel = WsChannel;

    async fn connect(&self, url: &str) -> Result<Self::Channel, SessionError> {
        let (stream, _) = connect_async(url).await.map_err(SessionError::connection)?;
        info!("✅ WebSocket 连接成功: {}", url);
        Ok(WsChannel {
            stream,
            closed: false,
        })
    }
}

/// WebSocket 通道
pub struct WsChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    closed: bool,
}

#[async_trait]
impl Channel for WsChannel {
    async fn send(&mut self, text: String) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Connection("连接已关闭".to_string()));
        }
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(SessionError::connection)
    }

    async fn recv(&mut self) -> ChannelEvent {
        while let Some(result) = self.stream.next().await {
            let msg = match result {
                Ok(msg) => msg,
                Err(e) => {
                    self.closed = true;
                    return ChannelEvent::Failed(e.to_string());
                }
            };

            match codec::decode(msg) {
                Ok(Frame::Text(text)) => return ChannelEvent::Message(text),
                Ok(Frame::Close(reason)) => {
                    self.closed = true;
                    return ChannelEvent::Closed(reason);
                }
                Ok(Frame::Control) => debug!("收到控制帧，忽略"),
                Err(e) => warn!("丢弃无法解码的帧: {}", e),
            }
        }

        self.closed = true;
        ChannelEvent::Closed(None)
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        match self.stream.close(None).await {
            Ok(()) => Ok(()),
            Err(tungstenite::Error::ConnectionClosed) | Err(tungstenite::Error::AlreadyClosed) => {
                Ok(())
            }
            Err(e) => Err(SessionError::connection(e)),
        }
    }
}
