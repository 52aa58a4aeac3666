/// 会话握手客户端
/// 
/// 持有唯一的连接：打开后立即请求身份，保存服务端分配的令牌，其余消息追加到日志

use crate::channel::{Channel, ChannelEvent, Connector};
use crate::session::{ConnectionState, EnvelopeOutcome, SessionState, SessionToken};
use common::SessionError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// 正在运行的连接
struct ActiveConnection {
    cancel: CancellationToken,
    reader: JoinHandle<()>,
}

/// 会话握手客户端
pub struct SessionClient {
    /// Server 地址
    server_url: String,

    /// 对外可观察的状态
    state: watch::Sender<SessionState>,

    /// 当前连接
    active: Option<ActiveConnection>,
}

impl SessionClient {
    /// 创建新的会话客户端
    pub fn new(server_url: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            server_url: server_url.into(),
            state,
            active: None,
        }
    }

    /// Server 地址
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// 建立连接并发送身份请求
    pub async fn start<K: Connector>(&mut self, connector: &K) -> Result<(), SessionError> {
        if let Some(active) = &self.active {
            let running = !active.reader.is_finished()
                && self.connection_state() != ConnectionState::Closed;
            if running {
                return Err(SessionError::AlreadyStarted);
            }
        }
        if let Some(finished) = self.active.take() {
            // 上一次连接已由对端结束
            if let Err(e) = finished.reader.await {
                warn!("接收任务异常结束: {}", e);
            }
        }

        self.state.send_modify(SessionState::connecting);
        info!("尝试连接到 Server: {}", self.server_url);

        let mut channel = match connector.connect(&self.server_url).await {
            Ok(channel) => channel,
            Err(e) => {
                error!("连接错误: {}", e);
                self.state.send_modify(|s| s.failed(e.to_string()));
                return Err(e);
            }
        };

        let mut request = None;
        self.state.send_modify(|s| request = Some(s.opened()));
        if let Some(request) = request {
            let json = request.to_json()?;
            if let Err(e) = channel.send(json).await {
                error!("发送身份请求失败: {}", e);
                let _ = channel.close().await;
                self.state.send_modify(|s| s.failed(e.to_string()));
                return Err(e);
            }
            debug!("已发送身份请求");
        }

        let cancel = CancellationToken::new();
        let reader = tokio::spawn(run_reader(channel, self.state.clone(), cancel.clone()));
        self.active = Some(ActiveConnection { cancel, reader });
        Ok(())
    }

    /// 关闭连接，重复调用无副作用
    ///
    /// 返回后不会再处理任何入站消息
    pub async fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            if let Err(e) = active.reader.await {
                warn!("接收任务异常结束: {}", e);
            }
        }
        self.state.send_if_modified(|s| s.close(None));
    }

    /// 当前状态的拷贝
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state.borrow().connection
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.state.borrow().token.clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.state.borrow().log.entries().to_vec()
    }
}

impl Drop for SessionClient {
    fn drop(&mut self) {
        if let Some(active) = &self.active {
            active.cancel.cancel();
        }
    }
}

/// 接收任务：逐条处理入站事件，直到对端关闭或被取消
async fn run_reader<C: Channel>(
    mut channel: C,
    state: watch::Sender<SessionState>,
    cancel: CancellationToken,
) {
    let failure = loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("会话已停止");
                break None;
            }
            event = channel.recv() => event,
        };

        match event {
            ChannelEvent::Message(raw) => dispatch(&state, &raw),
            ChannelEvent::Closed(reason) => {
                info!("连接已关闭: {}", reason.as_deref().unwrap_or("无原因"));
                break None;
            }
            ChannelEvent::Failed(e) => {
                error!("连接中断: {}", e);
                break Some(e);
            }
        }
    };

    if let Err(e) = channel.close().await {
        debug!("关闭通道失败: {}", e);
    }
    state.send_if_modified(|s| s.close(failure));
    debug!("接收任务结束");
}

/// 处理一条入站消息，格式错误只记录不中断
fn dispatch(state: &watch::Sender<SessionState>, raw: &str) {
    let mut result = None;
    state.send_if_modified(|s| {
        let outcome = s.handle_raw(raw);
        let changed = matches!(
            outcome,
            Ok(EnvelopeOutcome::TokenAssigned { .. }) | Ok(EnvelopeOutcome::Logged { .. })
        );
        result = Some(outcome);
        changed
    });

    if let Some(Err(e)) = result {
        warn!("丢弃入站消息: {}, raw={}", e, raw);
    }
}
