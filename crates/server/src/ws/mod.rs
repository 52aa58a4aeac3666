/// WebSocket 模块
/// 
/// 管理会话客户端的 WebSocket 连接

pub mod handler;
pub mod session_manager;

pub use handler::handle_session_websocket;
pub use session_manager::{SessionConnection, SessionManager};
