pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/evaluations", post(handlers::handle_upload))
        .route("/api/v1/evaluations/text", post(handlers::handle_text))
        .route("/api/v1/synthesize", post(handlers::handle_synthesize))
        .route("/api/v1/results/:id", get(handlers::handle_get_result))
        .route(
            "/api/v1/results/:id/text",
            get(handlers::handle_get_result_text),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::evaluation::rubric::Rubric;
    use crate::evaluation::synthesizer::ReportSynthesizer;
    use crate::llm_client::fake::FakeGenerator;
    use crate::store::MemoryResultStore;

    const BOUNDARY: &str = "cvreview-test-boundary";
    const PROSE_REPLY: &str = "1. Personal information: Name and email only.\n\
        6. Structure and formatting: Fonts vary a bit.\n\
        Overall assessment: Needs more detail.";

    fn router(generator: FakeGenerator, ttl: Duration) -> Router {
        build_router(AppState {
            generator: Arc::new(generator),
            store: Arc::new(MemoryResultStore::new(ttl)),
            synthesizer: ReportSynthesizer::new(Arc::new(Rubric::standard())),
            config: Config::for_tests(),
        })
    }

    fn default_router() -> Router {
        router(FakeGenerator::replying(PROSE_REPLY), Duration::from_secs(3600))
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.expect("route executes")
    }

    async fn read_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    async fn read_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        String::from_utf8(body.to_vec()).expect("utf-8 body")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, payload: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap()
    }

    /// (field name, file name, content)
    fn post_multipart(uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        let mut body: Vec<u8> = Vec::new();
        for (name, file_name, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let disposition = match file_name {
                Some(f) => format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n"),
                None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n"),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn create_text_evaluation(app: &Router) -> String {
        let response = send(
            app,
            post_json(
                "/api/v1/evaluations/text",
                json!({ "cvText": "Jane Doe, baker. Skills: Excel" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        payload["resultId"].as_str().expect("resultId").to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(&default_router(), get("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["service"], "cvreview-api");
    }

    #[tokio::test]
    async fn test_text_evaluation_is_stored_and_retrievable() {
        let app = default_router();
        let id = create_text_evaluation(&app).await;

        let response = send(&app, get(&format!("/api/v1/results/{id}"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        let raw = &payload["raw"];
        assert_eq!(raw["categories"]["formatting"]["score"], 4);
        assert_eq!(
            raw["categories"]["personal-info"]["commentary"],
            "Name and email only."
        );
        assert_eq!(raw["summary"]["generalRemark"], "Needs more detail.");
        assert_eq!(raw["categories"].as_object().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_result_url_points_at_result() {
        let app = default_router();
        let response = send(
            &app,
            post_json("/api/v1/evaluations/text", json!({ "cvText": "Jane Doe" })),
        )
        .await;
        let payload = read_json(response).await;
        let id = payload["resultId"].as_str().unwrap();
        assert_eq!(
            payload["resultUrl"],
            format!("http://localhost:8080/api/v1/results/{id}")
        );
    }

    #[tokio::test]
    async fn test_result_text_rendering() {
        let app = default_router();
        let id = create_text_evaluation(&app).await;
        let response = send(&app, get(&format!("/api/v1/results/{id}/text"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let text = read_text(response).await;
        assert!(text.contains("=== CV EVALUATION REPORT ==="));
        assert!(text.contains("## STRUCTURE AND FORMATTING\nScore: 4/10"));
    }

    #[tokio::test]
    async fn test_unknown_result_is_404() {
        let app = default_router();
        let missing = uuid::Uuid::new_v4();
        let response = send(&app, get(&format!("/api/v1/results/{missing}"))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let payload = read_json(response).await;
        assert_eq!(payload["code"], "NOT_FOUND");
        assert!(payload["error"].is_string());

        let response = send(&app, get("/api/v1/results/not-a-uuid")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_expired_result_is_410_then_404() {
        let app = router(FakeGenerator::replying(PROSE_REPLY), Duration::ZERO);
        let id = create_text_evaluation(&app).await;

        let response = send(&app, get(&format!("/api/v1/results/{id}"))).await;
        assert_eq!(response.status(), StatusCode::GONE);
        assert_eq!(read_json(response).await["code"], "EXPIRED");

        let response = send(&app, get(&format!("/api/v1/results/{id}"))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_llm_failure_is_502() {
        let app = router(FakeGenerator::failing(), Duration::from_secs(3600));
        let response = send(
            &app,
            post_json("/api/v1/evaluations/text", json!({ "cvText": "Jane Doe" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(read_json(response).await["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_blank_cv_text_is_400() {
        let response = send(
            &default_router(),
            post_json("/api/v1/evaluations/text", json!({ "cvText": "   " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_synthesize_reports_undecodable_narrative() {
        let response = send(
            &default_router(),
            post_multipart(
                "/api/v1/synthesize",
                &[
                    ("narrative", None, &[0x66, 0x6f, 0xff, 0xfe]),
                    ("source", None, b"Jane Doe"),
                ],
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        let raw = payload["raw"].as_object().unwrap();
        assert_eq!(raw.len(), 2);
        assert!(raw["error"].as_str().unwrap().contains("not valid UTF-8"));
        assert!(raw["rawText"].as_str().unwrap().starts_with("fo"));
    }

    #[tokio::test]
    async fn test_synthesize_builds_report() {
        let response = send(
            &default_router(),
            post_multipart(
                "/api/v1/synthesize",
                &[
                    ("narrative", None, b"6. Structure and formatting: Fonts vary a bit."),
                    ("source", None, b"Jane Doe, baker."),
                ],
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["raw"]["categories"]["formatting"]["score"], 4);
    }

    #[tokio::test]
    async fn test_synthesize_requires_narrative() {
        let response = send(
            &default_router(),
            post_multipart("/api/v1/synthesize", &[("source", None, b"Jane Doe")]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf() {
        let response = send(
            &default_router(),
            post_multipart("/api/v1/evaluations", &[("pdf", Some("cv.txt"), b"hello")]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_without_file_is_400() {
        let response = send(
            &default_router(),
            post_multipart("/api/v1/evaluations", &[("other", None, b"x")]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_unreadable_pdf_is_400() {
        let response = send(
            &default_router(),
            post_multipart(
                "/api/v1/evaluations",
                &[("pdf", Some("cv.pdf"), b"%PDF-1.4\nnot a real pdf body")],
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["code"], "UNREADABLE_DOCUMENT");
    }
}
