/// 会话 WebSocket 处理器
/// 
/// 接受客户端连接，回应身份请求并推送欢迎消息

use axum::extract::ws::{Message as AxumWsMessage, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use common::ws_session::TAG_MESSAGE;
use common::{Envelope, SessionError};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::app_state::AppState;

/// WebSocket 升级处理器
pub async fn handle_session_websocket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_session_connection(socket, state))
}

/// 处理会话 WebSocket 连接
async fn handle_session_connection(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // 创建消息发送通道
    let (tx, mut rx) = mpsc::unbounded_channel::<Envelope>();

    // 登记到管理器
    let connection = state.session_manager().register(tx.clone()).await;
    let session_id = connection.session_id.clone();
    info!("新的会话 WebSocket 连接: {}", session_id);

    // 创建消息发送任务
    let closer = connection.closer.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            let envelope = tokio::select! {
                biased;
                _ = closer.cancelled() => {
                    if let Err(e) = ws_sender.send(AxumWsMessage::Close(None)).await {
                        debug!("发送关闭帧失败: {}", e);
                    }
                    break;
                }
                envelope = rx.recv() => match envelope {
                    Some(envelope) => envelope,
                    None => break,
                },
            };
            if let Err(e) = send_envelope(&mut ws_sender, &envelope).await {
                error!("发送会话消息失败: {}", e);
                break;
            }
        }
        debug!("会话消息发送任务结束");
    });

    // 创建消息接收任务
    let recv_session_id = session_id.clone();
    let mut recv_task = tokio::spawn(async move {
        let mut identified = false;
        while let Some(result) = ws_receiver.next().await {
            let text = match result {
                Ok(AxumWsMessage::Text(text)) => text,
                Ok(AxumWsMessage::Binary(data)) => match String::from_utf8(data) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("二进制转字符串失败: {}", e);
                        continue;
                    }
                },
                Ok(AxumWsMessage::Close(_)) => {
                    debug!("会话 {} 请求关闭", recv_session_id);
                    break;
                }
                Ok(_) => continue,
                Err(e) => {
                    error!("接收会话消息错误: {}", e);
                    break;
                }
            };

            match replies_for(&text, &recv_session_id, &mut identified) {
                Ok(replies) => {
                    for reply in replies {
                        if tx.send(reply).is_err() {
                            warn!("会话 {} 的发送通道已关闭", recv_session_id);
                            return;
                        }
                    }
                }
                Err(e) => warn!("丢弃客户端消息: {}, raw={}", e, text),
            }
        }
        debug!("会话消息接收任务结束");
    });

    // 等待任一任务完成
    tokio::select! {
        _ = &mut send_task => {
            debug!("会话发送任务已结束");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("会话接收任务已结束");
            send_task.abort();
        }
    }

    // 清理：从管理器中注销
    state.session_manager().unregister(&session_id).await;
    info!("会话连接已关闭: {}", session_id);
}

/// 计算对一条客户端消息的回复
///
/// 身份请求总是回复会话令牌，首次请求额外推送欢迎消息
pub fn replies_for(
    raw: &str,
    session_id: &str,
    identified: &mut bool,
) -> Result<Vec<Envelope>, SessionError> {
    let envelope = Envelope::from_json(raw)?;

    if !envelope.is_identify_request() {
        debug!("收到未知的客户端消息类型: {}", envelope.kind);
        return Ok(Vec::new());
    }

    let mut replies = vec![Envelope::identification(session_id)];
    if !*identified {
        *identified = true;
        replies.push(Envelope::log(
            TAG_MESSAGE,
            format!("Welcome to the session: {}", session_id),
        ));
    } else {
        debug!("会话 {} 重复请求身份", session_id);
    }
    Ok(replies)
}

/// 发送会话信封
async fn send_envelope(
    sender: &mut futures_util::stream::SplitSink<WebSocket, AxumWsMessage>,
    envelope: &Envelope,
) -> Result<(), String> {
    let json = envelope
        .to_json()
        .map_err(|e| format!("序列化会话消息失败: {}", e))?;

    sender
        .send(AxumWsMessage::Text(json))
        .await
        .map_err(|e| format!("发送会话 WebSocket 消息失败: {}", e))
}
