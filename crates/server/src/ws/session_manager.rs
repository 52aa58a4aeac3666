/// 会话连接管理器
/// 
/// 负责登记所有已接入的会话 WebSocket 连接

use common::{Envelope, Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// 会话连接信息
#[derive(Debug, Clone)]
pub struct SessionConnection {
    /// 会话 ID（同时作为下发给客户端的令牌）
    pub session_id: String,

    /// 发送消息的通道
    pub sender: mpsc::UnboundedSender<Envelope>,

    /// 连接时间
    pub connected_at: chrono::DateTime<chrono::Utc>,

    /// 服务端主动断开的信号
    pub closer: CancellationToken,
}

/// 会话连接管理器
#[derive(Clone)]
pub struct SessionManager {
    /// 所有连接的映射：session_id -> SessionConnection
    sessions: Arc<RwLock<HashMap<String, Arc<SessionConnection>>>>,
}

impl SessionManager {
    /// 创建新的会话管理器
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 登记新的连接并分配会话 ID
    pub async fn register(&self, sender: mpsc::UnboundedSender<Envelope>) -> Arc<SessionConnection> {
        let connection = Arc::new(SessionConnection {
            session_id: common::utils::generate_session_id(),
            sender,
            connected_at: chrono::Utc::now(),
            closer: CancellationToken::new(),
        });

        let mut sessions = self.sessions.write().await;
        sessions.insert(connection.session_id.clone(), connection.clone());

        info!("会话已登记: {} (当前 {} 个)", connection.session_id, sessions.len());
        connection
    }

    /// 注销会话连接
    pub async fn unregister(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(session_id).is_some();
        if removed {
            info!("会话 {} 已断开", session_id);
        } else {
            debug!("会话 {} 不存在", session_id);
        }
        removed
    }

    /// 服务端主动断开会话：注销并通知连接处理器关闭 WebSocket
    pub async fn disconnect(&self, session_id: &str) -> bool {
        let removed = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(session_id)
        };
        match removed {
            Some(connection) => {
                connection.closer.cancel();
                info!("会话 {} 已被服务端断开", session_id);
                true
            }
            None => {
                debug!("会话 {} 不存在", session_id);
                false
            }
        }
    }

    /// 会话是否在线
    pub async fn is_connected(&self, session_id: &str) -> bool {
        let sessions = self.sessions.read().await;
        sessions.contains_key(session_id)
    }

    /// 获取会话连接
    pub async fn get(&self, session_id: &str) -> Option<Arc<SessionConnection>> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// 获取连接数量
    pub async fn count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    /// 向指定会话发送信封
    pub async fn send(&self, session_id: &str, envelope: Envelope) -> Result<()> {
        let connection = self
            .get(session_id)
            .await
            .ok_or_else(|| Error::NotFound(session_id.to_string()))?;

        connection
            .sender
            .send(envelope)
            .map_err(|_| Error::Internal(format!("会话 {} 的发送通道已关闭", session_id)))
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_unregister() {
        let manager = SessionManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let connection = manager.register(tx).await;
        assert!(manager.is_connected(&connection.session_id).await);
        assert_eq!(manager.count().await, 1);

        assert!(manager.unregister(&connection.session_id).await);
        assert!(!manager.unregister(&connection.session_id).await);
        assert!(!manager.is_connected(&connection.session_id).await);
        assert_eq!(manager.count().await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_signals_handler() {
        let manager = SessionManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let connection = manager.register(tx).await;

        assert!(manager.disconnect(&connection.session_id).await);
        assert!(connection.closer.is_cancelled());
        assert!(!manager.is_connected(&connection.session_id).await);
        assert!(!manager.disconnect(&connection.session_id).await);
    }

    #[tokio::test]
    async fn test_session_ids_are_unique() {
        let manager = SessionManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let a = manager.register(tx.clone()).await;
        let b = manager.register(tx).await;
        assert_ne!(a.session_id, b.session_id);
        assert_eq!(manager.count().await, 2);
    }

    #[tokio::test]
    async fn test_send_to_session() {
        let manager = SessionManager::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection = manager.register(tx).await;

        manager
            .send(&connection.session_id, Envelope::log("chat", "hello"))
            .await
            .unwrap();
        assert_eq!(rx.recv().await, Some(Envelope::log("chat", "hello")));
    }

    #[tokio::test]
    async fn test_send_errors() {
        let manager = SessionManager::new();
        let err = manager.send("missing", Envelope::log("chat", "x")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let (tx, rx) = mpsc::unbounded_channel();
        let connection = manager.register(tx).await;
        drop(rx);
        let err = manager
            .send(&connection.session_id, Envelope::log("chat", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }
}
