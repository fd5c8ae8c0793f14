mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use common::*;

const BOUNDARY: &str = "X-RECRUITMENT-BOUNDARY";

struct Part<'a> {
    field: &'a str,
    filename: &'a str,
    content_type: &'a str,
    data: &'a [u8],
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.field, part.filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn upload(app: &Router, uri: &str, parts: &[Part<'_>]) -> (StatusCode, JsonValue) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null))
}

#[tokio::test]
async fn resume_upload_stores_file_and_serves_it() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(test_config(dir.path()));

    let (status, body) = upload(
        &app,
        "/api/upload/resume",
        &[Part {
            field: "resume",
            filename: "cv.pdf",
            content_type: "application/pdf",
            data: b"%PDF-1.4 resume",
        }],
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let data = &body["data"];
    assert_eq!(data["originalName"], "cv.pdf");
    assert_eq!(data["type"], "resume");
    assert_eq!(data["mimetype"], "application/pdf");
    assert_eq!(data["size"], 15);
    let filename = data["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with(".pdf"));
    assert!(dir.path().join(&filename).exists());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/uploads/{}", filename))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/upload/file/{}", filename),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "File deleted successfully");
    assert!(!dir.path().join(&filename).exists());

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/upload/file/{}", filename),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "File not found");
}

#[tokio::test]
async fn documents_are_typed_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(test_config(dir.path()));

    let (status, body) = upload(
        &app,
        "/api/upload/application-documents",
        &[
            Part {
                field: "documents",
                filename: "letter.docx",
                content_type:
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                data: b"docx",
            },
            Part {
                field: "documents",
                filename: "photo.png",
                content_type: "image/png",
                data: b"png",
            },
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let files = body["data"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["type"], "word");
    assert_eq!(files[1]["type"], "image");
}

#[tokio::test]
async fn disallowed_type_and_wrong_field_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(test_config(dir.path()));

    let (status, body) = upload(
        &app,
        "/api/upload/resume",
        &[Part {
            field: "resume",
            filename: "virus.exe",
            content_type: "application/x-msdownload",
            data: b"MZ",
        }],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = upload(
        &app,
        "/api/upload/resume",
        &[Part {
            field: "cv",
            filename: "cv.pdf",
            content_type: "application/pdf",
            data: b"%PDF",
        }],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn more_than_five_documents_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(test_config(dir.path()));
    let parts: Vec<Part<'_>> = (0..6)
        .map(|_| Part {
            field: "documents",
            filename: "notes.txt",
            content_type: "text/plain",
            data: b"hello",
        })
        .collect();
    let (status, _) = upload(&app, "/api/upload/application-documents", &parts).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn traversal_in_delete_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(test_config(dir.path()));
    let (status, body) = send(&app, Method::DELETE, "/api/upload/file/..%2Fsecret", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid filename");
}

#[tokio::test]
async fn oversized_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = recruitment_portal::config::Config {
        max_upload_bytes: 8,
        ..test_config(dir.path())
    };
    let app = app(config);
    let (status, _) = upload(
        &app,
        "/api/upload/resume",
        &[Part {
            field: "resume",
            filename: "cv.txt",
            content_type: "text/plain",
            data: b"this is longer than eight bytes",
        }],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
