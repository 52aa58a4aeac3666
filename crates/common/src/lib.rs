/// DFO 会话 - 公共库
/// 
/// 提供 Server 和 Client 共享的协议类型、错误处理、工具函数等

pub mod errors;
pub mod utils;
pub mod ws_session;

// 重新导出常用类型
pub use errors::{Error, Result};
pub use ws_session::{Envelope, InboundEnvelope, SessionError};
