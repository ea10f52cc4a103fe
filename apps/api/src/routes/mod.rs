pub mod catalog;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/", get(catalog::root_handler))
        .route("/health", get(health::health_handler))
        .route("/templates", get(catalog::templates_handler))
        .route("/pricing", get(catalog::pricing_handler))
        // Quota-guarded analysis API
        .route("/analyze", post(handlers::handle_analyze))
        .route(
            "/analyze/upload",
            post(handlers::handle_analyze_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/match", post(handlers::handle_match))
        .route("/improve", post(handlers::handle_improve))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use chrono::{Duration, Local};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::access::guard::{API_KEY_HEADER, FORWARDED_FOR_HEADER};
    use crate::access::start_of_day;
    use crate::analysis::rules::RuleSet;
    use crate::config::Config;

    const RESUME: &str = "Senior engineer, 5 years experience in Python, AWS, Docker. \
                          Led a team of 4. Increased throughput by 30%.";
    const BOUNDARY: &str = "resume-insight-boundary";

    fn app_with(config: Config) -> Router {
        build_router(AppState::new(config, RuleSet::builtin()))
    }

    fn app() -> Router {
        app_with(Config::for_tests())
    }

    fn post_json(uri: &str, body: Value, forwarded_for: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(FORWARDED_FOR_HEADER, forwarded_for)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn upload(filename: &str, content: &[u8], forwarded_for: &str) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/analyze/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(FORWARDED_FOR_HEADER, forwarded_for)
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_root_and_static_catalogs() {
        let app = app();
        let (status, root) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(root["pricing"]["free"], "3 analyses per day");
        assert!(root["docs"].as_str().unwrap().contains("/analyze/upload"));
        let endpoints = root["endpoints"].as_array().unwrap();
        assert_eq!(endpoints.len(), 7);
        assert!(endpoints.contains(&json!("POST /analyze/upload")));

        let (_, templates) =
            send(&app, Request::get("/templates").body(Body::empty()).unwrap()).await;
        assert_eq!(templates["templates"].as_array().unwrap().len(), 4);
        assert_eq!(templates["templates"][0]["id"], "software-engineer");

        let (_, pricing) = send(&app, Request::get("/pricing").body(Body::empty()).unwrap()).await;
        assert_eq!(pricing["plans"][1]["price"], 19);
        // No checkout link configured, so none is advertised.
        assert!(pricing["plans"][1].get("signup_url").is_none());
    }

    #[tokio::test]
    async fn test_pricing_advertises_configured_signup_url() {
        let config = Config {
            pro_signup_url: Some("https://buy.example.com/pro".to_string()),
            ..Config::for_tests()
        };
        let (status, pricing) = send(
            &app_with(config),
            Request::get("/pricing").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(pricing["plans"][1]["signup_url"], "https://buy.example.com/pro");
        assert!(pricing["plans"][0].get("signup_url").is_none());
    }

    #[tokio::test]
    async fn test_analyze_returns_result() {
        let (status, body) = send(&app(), post_json("/analyze", json!({ "text": RESUME }), "1.1.1.1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["experience_years"], 5);
        assert!(body["skills"]
            .as_array()
            .unwrap()
            .contains(&json!("AWS")));
    }

    #[tokio::test]
    async fn test_short_text_is_rejected() {
        let (status, body) =
            send(&app(), post_json("/analyze", json!({ "text": "too short" }), "1.1.1.2")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_improve_with_forty_characters_is_rejected() {
        let resume = "a".repeat(40);
        let (status, _) = send(
            &app(),
            post_json("/improve", json!({ "resume_text": resume }), "1.1.1.3"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_fourth_free_request_gets_429() {
        let app = app();
        for _ in 0..3 {
            let (status, _) = send(&app, post_json("/analyze", json!({ "text": RESUME }), "9.9.9.9")).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send(&app, post_json("/analyze", json!({ "text": RESUME }), "9.9.9.9")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["upgrade_url"], "http://localhost:8000/pricing");
        let expected_reset = start_of_day(Local::now()) + Duration::hours(24);
        assert_eq!(body["reset_at"], expected_reset.to_rfc3339());
        assert!(body["error"].as_str().unwrap().contains("Daily limit"));

        // Another address still has its own allowance.
        let (status, _) = send(&app, post_json("/analyze", json!({ "text": RESUME }), "8.8.8.8")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_quota_is_shared_across_endpoints() {
        let app = app();
        let addr = "7.7.7.7, 10.0.0.1";
        send(&app, post_json("/analyze", json!({ "text": RESUME }), addr)).await;
        send(&app, post_json("/improve", json!({ "resume_text": RESUME }), addr)).await;
        send(
            &app,
            post_json(
                "/match",
                json!({ "resume_text": RESUME, "job_description": RESUME }),
                addr,
            ),
        )
        .await;
        // Same first hop, different proxy chain.
        let (status, _) = send(&app, post_json("/analyze", json!({ "text": RESUME }), "7.7.7.7")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_pro_key_is_never_limited() {
        let config = Config {
            pro_api_keys: vec!["pro-123".to_string()],
            ..Config::for_tests()
        };
        let app = app_with(config);
        for _ in 0..10 {
            let mut request = post_json("/analyze", json!({ "text": RESUME }), "6.6.6.6");
            request
                .headers_mut()
                .insert(API_KEY_HEADER, "pro-123".parse().unwrap());
            let (status, _) = send(&app, request).await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_match_identical_text() {
        let (status, body) = send(
            &app(),
            post_json(
                "/match",
                json!({ "resume_text": RESUME, "job_description": RESUME }),
                "2.2.2.2",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fit_score"], 100);
        assert_eq!(body["missing_skills"], json!([]));
    }

    #[tokio::test]
    async fn test_match_rejects_short_job_description() {
        let (status, body) = send(
            &app(),
            post_json(
                "/match",
                json!({ "resume_text": RESUME, "job_description": "Rust dev" }),
                "2.2.2.3",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Job description too short");
    }

    #[tokio::test]
    async fn test_improve_with_target_role() {
        let (status, body) = send(
            &app(),
            post_json(
                "/improve",
                json!({ "resume_text": RESUME, "target_role": "Staff Engineer" }),
                "3.3.3.3",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["action_items"].as_array().unwrap().len(), 5);
        let sections: Vec<&str> = body["suggestions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["section"].as_str().unwrap())
            .collect();
        assert!(sections.contains(&"Targeting"));
        assert!(body["rewritten_sections"]["summary"].is_string());
    }

    #[tokio::test]
    async fn test_upload_text_file() {
        let (status, body) = send(&app(), upload("resume.txt", RESUME.as_bytes(), "4.4.4.4")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["experience_years"], 5);
    }

    #[tokio::test]
    async fn test_upload_with_too_little_text() {
        let (status, body) = send(&app(), upload("resume.pdf", b"%PDF-1.4", "4.4.4.5")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Could not extract sufficient text from file"
        );
    }

    #[tokio::test]
    async fn test_upload_over_size_limit() {
        let config = Config {
            max_upload_bytes: 1024,
            ..Config::for_tests()
        };
        let content = RESUME.repeat(20);
        assert!(content.len() > 1024);
        let (status, body) = send(&app_with(config), upload("resume.txt", content.as_bytes(), "4.4.4.6")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("File too large"));
    }

    #[tokio::test]
    async fn test_upload_under_default_limit_is_accepted() {
        let content = RESUME.repeat(3_000_000 / RESUME.len());
        assert!(content.len() > 2_900_000);
        let (status, body) = send(&app(), upload("resume.txt", content.as_bytes(), "4.4.4.7")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["experience_years"], 5);
    }

    #[tokio::test]
    async fn test_upload_over_default_limit_is_rejected() {
        let config = Config::for_tests();
        let content = vec![b'a'; config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES + 1024];
        let (status, body) = send(&app_with(config), upload("resume.txt", &content, "4.4.4.8")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("File too large"));
    }
}
