use axum::{
    http::HeaderValue,
    routing::{get, put},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

mod health;
pub mod todos;

pub use health::health;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let todo_router = Router::new()
        .route("/", get(todos::routes::list).post(todos::routes::create))
        .route(
            "/{todo_id}",
            put(todos::routes::update).delete(todos::routes::delete),
        );

    Router::new()
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .route("/", get(health::root))
                .route("/health", get(health))
                .nest("/todos", todo_router),
        )
}

/// Static origin allow-list; methods and headers are mirrored back so any are accepted.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::routes::todos::memory::MemoryTodoRepository;

    fn app(repo: Arc<MemoryTodoRepository>) -> Router {
        let origins = vec!["http://localhost:5500".to_string(), "null".to_string()];
        routes()
            .with_state(AppState::new(repo))
            .layer(cors_layer(&origins))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_connected() {
        let app = app(Arc::new(MemoryTodoRepository::new()));

        for uri in ["/health", "/api/health"] {
            let (status, body) = get_json(app.clone(), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["database_status"], "connected");
            assert!(body["message"].is_string());
        }
    }

    #[tokio::test]
    async fn test_health_disconnected() {
        let repo = Arc::new(MemoryTodoRepository::new());
        repo.set_offline(true);

        let (status, body) = get_json(app(repo), "/api/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["database_status"], "disconnected");
    }

    #[tokio::test]
    async fn test_api_root() {
        let (status, body) = get_json(app(Arc::new(MemoryTodoRepository::new())), "/api").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Todo API is running");
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed_origin() {
        let resp = app(Arc::new(MemoryTodoRepository::new()))
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/todos")
                    .header(header::ORIGIN, "http://localhost:5500")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = resp.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5500"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "DELETE");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn test_cors_unknown_origin_not_echoed() {
        let resp = app(Arc::new(MemoryTodoRepository::new()))
            .oneshot(
                Request::builder()
                    .uri("/api/todos")
                    .header(header::ORIGIN, "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
