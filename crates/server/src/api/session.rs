/// 会话 API

use axum::{
    extract::State,
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{app_state::AppState, ws};

/// 会话 ID 请求头
pub const SESSION_ID_HEADER: &str = "session-id";

#[derive(Debug, Serialize)]
pub struct SessionIndexResponse {
    pub message: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(session_index))
        .route("/ws", get(ws::handle_session_websocket))
}

/// 查询会话是否在线
async fn session_index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<SessionIndexResponse> {
    let session_id = headers
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let message = if state.session_manager().is_connected(session_id).await {
        format!("Welcome to the DFO algorithm session: {}!", session_id)
    } else {
        format!(
            "Session '{}' doesn't exists. Please connect to the WebSocket endpoint to start the session.",
            session_id
        )
    };

    Json(SessionIndexResponse { message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::SessionManager;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_message(app: Router, request: Request<Body>) -> String {
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        value["message"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_index_for_connected_session() {
        let manager = SessionManager::new();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let connection = manager.register(tx).await;
        let app = crate::build_router(AppState::new(manager), "/api/v1");

        let request = Request::builder()
            .uri("/api/v1/session")
            .header(SESSION_ID_HEADER, connection.session_id.as_str())
            .body(Body::empty())
            .unwrap();
        let message = get_message(app, request).await;
        assert_eq!(
            message,
            format!("Welcome to the DFO algorithm session: {}!", connection.session_id)
        );
    }

    #[tokio::test]
    async fn test_index_for_unknown_session() {
        let app = crate::build_router(AppState::new(SessionManager::new()), "/api/v1");

        let request = Request::builder()
            .uri("/api/v1/session")
            .header(SESSION_ID_HEADER, "nope")
            .body(Body::empty())
            .unwrap();
        let message = get_message(app, request).await;
        assert!(message.starts_with("Session 'nope' doesn't exists."));
    }
}
