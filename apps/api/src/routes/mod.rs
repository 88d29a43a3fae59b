pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route("/api/v1/resumes", post(handlers::handle_generate))
        .route(
            "/api/v1/resumes/freeform",
            post(handlers::handle_generate_freeform),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::generation::generator::testing::generator_with;
    use crate::llm_client::testing::ScriptedTransport;

    fn app(transport: Arc<ScriptedTransport>) -> Router {
        build_router(AppState {
            generator: generator_with(transport),
            config: Arc::new(Config::with_api_key("test-key".to_string())),
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(ScriptedTransport::replying("{}"))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resumer");
    }

    #[tokio::test]
    async fn test_missing_name_is_400_without_ai_call() {
        let transport = ScriptedTransport::replying("{}");
        let response = app(transport.clone())
            .oneshot(post_json(
                "/api/v1/resumes",
                json!({"name": "", "email": "jane@x.com"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Name & Email required.");
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_structured_pdf_download() {
        let transport = ScriptedTransport::replying(
            r#"{"summary":"Backend engineer.","skills":["Go","SQL"]}"#,
        );
        let response = app(transport.clone())
            .oneshot(post_json(
                "/api/v1/resumes",
                json!({"name": "Jane Doe", "email": "jane@x.com"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_structured_json_format() {
        let transport = ScriptedTransport::replying(r#"{"skills":"Rust, Go"}"#);
        let response = app(transport)
            .oneshot(post_json(
                "/api/v1/resumes?format=json",
                json!({"name": "Jane Doe", "email": "jane@x.com"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let body = body_json(response).await;
        assert_eq!(body["name"], "Jane Doe");
        assert_eq!(body["skills"], json!(["Rust", "Go"]));
    }

    #[tokio::test]
    async fn test_freeform_text_download() {
        let transport = ScriptedTransport::replying("JANE DOE\nBackend engineer");
        let response = app(transport)
            .oneshot(post_json(
                "/api/v1/resumes/freeform",
                json!({"name": "Jane Doe", "email": "jane@x.com"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.txt\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"JANE DOE\nBackend engineer");
    }

    #[tokio::test]
    async fn test_unknown_format_is_rejected() {
        let transport = ScriptedTransport::replying("{}");
        let response = app(transport.clone())
            .oneshot(post_json(
                "/api/v1/resumes?format=docx",
                json!({"name": "Jane Doe", "email": "jane@x.com"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(transport.call_count(), 0);
    }
}
