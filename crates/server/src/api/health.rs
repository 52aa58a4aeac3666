use axum::{routing::get, Router};
use tracing::info;

use crate::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(ping))
}

async fn ping() -> &'static str {
    info!("PING");
    "PONG"
}

#[cfg(test)]
mod tests {
    use crate::{app_state::AppState, ws::SessionManager};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_ping() {
        let app = crate::build_router(AppState::new(SessionManager::new()), "/api/v1");
        let request = Request::builder().uri("/api/v1/ping").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"PONG");
    }

    #[tokio::test]
    async fn test_unnormalized_prefixes_are_served() {
        for (prefix, uri) in [("api/v1/", "/api/v1/ping"), ("/", "/ping"), ("", "/ping")] {
            let app = crate::build_router(AppState::new(SessionManager::new()), prefix);
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

            let response = app.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "prefix={:?}", prefix);
        }
    }
}
