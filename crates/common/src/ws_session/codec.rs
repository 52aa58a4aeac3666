/// WebSocket 帧解码

use super::SessionError;
use tokio_tungstenite::tungstenite::Message as WsMessage;

/// 解码后的帧
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// 文本负载（文本帧或 UTF-8 二进制帧）
    Text(String),

    /// 对端关闭，可能带原因
    Close(Option<String>),

    /// ping/pong 等控制帧
    Control,
}

/// 解码 WebSocket 帧
pub fn decode(ws_msg: WsMessage) -> Result<Frame, SessionError> {
    match ws_msg {
        WsMessage::Text(text) => Ok(Frame::Text(text)),
        WsMessage::Binary(data) => String::from_utf8(data)
            .map(Frame::Text)
            .map_err(SessionError::parse),
        WsMessage::Close(frame) => {
            let reason = frame
                .map(|f| f.reason.into_owned())
                .filter(|r| !r.is_empty());
            Ok(Frame::Close(reason))
        }
        _ => Ok(Frame::Control),
    }
}
