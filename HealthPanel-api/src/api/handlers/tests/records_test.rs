use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use health_panel_domain::testing::MockMedicalRecordService;

use crate::api::create_app;
use crate::config::AppConfig;

const BOUNDARY: &str = "health-panel-test-boundary";

struct Part<'a> {
    field: &'a str,
    file_name: &'a str,
    content_type: &'a str,
    bytes: &'a [u8],
}

fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.field, part.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
        body.extend_from_slice(part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(uri: &str, parts: &[Part]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn test_app(service: MockMedicalRecordService) -> Router {
    create_app(Arc::new(service), &AppConfig::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn pdf_part(name: &str) -> Part<'_> {
    Part {
        field: "files",
        file_name: name,
        content_type: "application/pdf",
        bytes: b"%PDF-1.5",
    }
}

#[tokio::test]
async fn test_create_session() {
    let app = test_app(MockMedicalRecordService::new());
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/sessions")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["session_id"].as_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn test_upload_returns_report_and_dashboard() {
    let id = Uuid::new_v4();
    let app = test_app(MockMedicalRecordService::new().with_session(id));

    let request = upload_request(
        &format!("/api/v1/sessions/{}/uploads", id),
        &[pdf_part("a.pdf"), pdf_part("b.pdf")],
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    let files = body["report"]["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["name"], "a.pdf");
    assert_eq!(files[0]["status"], "processed");
    assert!(body["dashboard"]["charts"].is_array());
}

#[tokio::test]
async fn test_drop_source_skips_non_pdf_files() {
    let id = Uuid::new_v4();
    let app = test_app(MockMedicalRecordService::new().with_session(id));

    let request = upload_request(
        &format!("/api/v1/sessions/{}/uploads?source=drop", id),
        &[
            Part {
                field: "file",
                file_name: "notes.txt",
                content_type: "text/plain",
                bytes: b"Blood Pressure: 120/80",
            },
            pdf_part("record.pdf"),
        ],
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    let files = body["report"]["files"].as_array().unwrap();
    assert_eq!(files[0]["status"], "skipped");
    assert_eq!(files[1]["status"], "processed");
}

#[tokio::test]
async fn test_unrelated_fields_are_ignored() {
    let id = Uuid::new_v4();
    let app = test_app(MockMedicalRecordService::new().with_session(id));

    let request = upload_request(
        &format!("/api/v1/sessions/{}/uploads", id),
        &[Part {
            field: "comment",
            file_name: "comment.txt",
            content_type: "text/plain",
            bytes: b"hello",
        }],
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_invalid_source_is_rejected() {
    let id = Uuid::new_v4();
    let app = test_app(MockMedicalRecordService::new().with_session(id));

    let request = upload_request(
        &format!("/api/v1/sessions/{}/uploads?source=camera", id),
        &[pdf_part("a.pdf")],
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_to_unknown_session() {
    let app = test_app(MockMedicalRecordService::new());

    let request = upload_request(
        &format!("/api/v1/sessions/{}/uploads", Uuid::new_v4()),
        &[pdf_part("a.pdf")],
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_dashboard_and_end_session() {
    let id = Uuid::new_v4();
    let app = test_app(MockMedicalRecordService::new().with_session(id));

    let dashboard = Request::builder()
        .uri(format!("/api/v1/sessions/{}/dashboard", id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.clone(), dashboard).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["charts"].as_array().unwrap().len(), 3);
    assert_eq!(body["charts"][0]["id"], "bp-chart");

    let end = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/sessions/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app.clone(), end).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let dashboard = Request::builder()
        .uri(format!("/api/v1/sessions/{}/dashboard", id))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app, dashboard).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_repository_failure_is_internal_error() {
    let app = test_app(MockMedicalRecordService::new().with_repository_failure());
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/sessions")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
    assert_eq!(body["message"], "An unexpected error occurred");
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let app = test_app(MockMedicalRecordService::new());
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}
