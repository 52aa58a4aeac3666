/// DFO 会话 - 服务端
/// 
/// 为会话客户端提供 WebSocket 握手端点与会话查询 API

pub mod api;
pub mod app_state;
pub mod config;
pub mod ws;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::app_state::AppState;

/// 构建应用路由
///
/// `api_prefix` 可带或不带首尾斜杠，`/` 或空串表示挂在根路径
pub fn build_router(state: AppState, api_prefix: &str) -> Router {
    // 设置CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let prefix = common::utils::normalize_prefix(api_prefix);
    let router = Router::new().route("/", get(root_handler));
    let router = if prefix.is_empty() {
        router.merge(api::api_routes())
    } else {
        router.nest(&prefix, api::api_routes())
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "DFO Session Server API v1"
}
