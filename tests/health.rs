use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use jobs_crm_assistant::api::{self, CorsPolicy};
use serde_json::json;
use tower::ServiceExt; // for oneshot

fn client(cors: CorsPolicy) -> Router {
    api::router(&cors).unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let response = client(CorsPolicy::default())
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], br#"{"status":"healthy"}"#);
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn health_is_get_only() {
    let response = client(CorsPolicy::default())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let response = client(CorsPolicy::default())
        .oneshot(
            Request::builder()
                .uri("/api/v1/contacts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn permissive_policy_echoes_any_origin_with_credentials() {
    let response = client(CorsPolicy::Permissive)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "https://anywhere.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://anywhere.example"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn permissive_preflight_mirrors_method_and_headers() {
    let response = client(CorsPolicy::Permissive)
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/health")
                .header(header::ORIGIN, "https://anywhere.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://anywhere.example"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "DELETE");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "x-custom");
}

#[tokio::test]
async fn allow_list_only_echoes_listed_origins() {
    let app = client(CorsPolicy::AllowList(vec![
        "https://app.example".to_string(),
    ]));

    let allowed = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "https://app.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://app.example"
    );
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );

    let denied = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "https://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    // The probe still answers; the browser enforces the missing header.
    assert_eq!(denied.status(), StatusCode::OK);
    assert!(
        denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
