/// 应用全局状态

use crate::ws::SessionManager;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    /// 会话 WebSocket 连接管理器
    pub session_manager: SessionManager,
}

impl AppState {
    pub fn new(session_manager: SessionManager) -> Self {
        Self { session_manager }
    }

    /// 获取会话连接管理器
    pub fn session_manager(&self) -> SessionManager {
        self.session_manager.clone()
    }
}
