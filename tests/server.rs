//! Integration tests for the HTTP surface, with a fake model standing in for ONNX Runtime.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat};
use tower::ServiceExt;

use animegan_serve::image::ImageTensor;
use animegan_serve::model::StyleModel;
use animegan_serve::server::{self, AppState};
use animegan_serve::{ExecutionDevice, Result, ServerConfig, StyleVariant, Stylizer};

const BOUNDARY: &str = "XTESTBOUNDARYX";

/// Inverts every pixel and counts how often it ran.
struct NegativeModel {
    calls: Arc<AtomicUsize>,
}

impl StyleModel for NegativeModel {
    fn name(&self) -> &str {
        "negative"
    }

    fn infer(&mut self, input: &ImageTensor) -> Result<ImageTensor> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(input.mapv(|v| -v))
    }
}

fn build_app(variant: StyleVariant, config: ServerConfig) -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let model = NegativeModel {
        calls: Arc::clone(&calls),
    };
    let stylizer = Stylizer::with_model(variant, ExecutionDevice::Cpu, Box::new(model));
    (server::router(AppState::new(stylizer, config)), calls)
}

fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

fn multipart_body(filename: &str, file: &[u8], scale: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file);
    body.extend_from_slice(b"\r\n");
    if let Some(scale) = scale {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"scale\"\r\n\r\n{scale}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn post_upload(app: Router, body: Vec<u8>) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri("/stylize")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn index_renders_upload_form() {
    let (app, _) = build_app(StyleVariant::Face2Paint, ServerConfig::default());
    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-request-id").is_some());

    let html = body_text(response).await;
    assert!(html.contains("AnimeGAN2 Face Stylizer"));
    assert!(html.contains(r#"accept=".jpg,.jpeg,.png""#));
    assert!(html.contains(r#"<option value="3x">3x</option>"#));
}

#[tokio::test]
async fn health_reports_model() {
    let (app, _) = build_app(StyleVariant::Hayao, ServerConfig::default());
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["variant"], "hayao");
    assert_eq!(json["device"], "cpu");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (app, _) = build_app(StyleVariant::Hayao, ServerConfig::default());
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Stylization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn jpeg_upload_is_stylized_and_scaled() {
    let (app, calls) = build_app(StyleVariant::Hayao, ServerConfig::default());
    let jpeg = encoded_image(640, 480, ImageFormat::Jpeg);
    let response = post_upload(app, multipart_body("photo.jpg", &jpeg, Some("2x"))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let html = body_text(response).await;
    assert!(html.contains("Size: 640 x 480"));
    assert!(html.contains("Size: 1280 x 960"));
    assert!(html.contains(r#"download="converted.png""#));
    assert!(html.contains(r#"href="data:image/png;base64,"#));
}

#[tokio::test]
async fn missing_scale_defaults_to_original() {
    let (app, _) = build_app(StyleVariant::Hayao, ServerConfig::default());
    let png = encoded_image(300, 300, ImageFormat::Png);
    let response = post_upload(app, multipart_body("photo.png", &png, None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Size: 300 x 300"));
    assert!(html.contains("Size: 296 x 296"));
}

#[tokio::test]
async fn face2paint_download_name() {
    let (app, _) = build_app(StyleVariant::Face2Paint, ServerConfig::default());
    let png = encoded_image(64, 48, ImageFormat::Png);
    let response = post_upload(app, multipart_body("face.png", &png, Some("1.5x"))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Size: 768 x 768"));
    assert!(html.contains(r#"download="anime_output.png""#));
}

// ---------------------------------------------------------------------------
// Rejections happen before inference
// ---------------------------------------------------------------------------

#[tokio::test]
async fn text_file_is_rejected_before_inference() {
    let (app, calls) = build_app(StyleVariant::Hayao, ServerConfig::default());
    let response = post_upload(app, multipart_body("notes.txt", b"just some text", None)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let html = body_text(response).await;
    assert!(html.contains(r#"class="error""#));
    assert!(html.contains("notes.txt"));
}

#[tokio::test]
async fn text_content_with_image_name_is_rejected_before_inference() {
    let (app, calls) = build_app(StyleVariant::Hayao, ServerConfig::default());
    let response = post_upload(app, multipart_body("photo.png", b"not really a png", None)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(body_text(response).await.contains("failed to decode image"));
}

#[tokio::test]
async fn unoffered_scale_is_rejected() {
    let (app, calls) = build_app(StyleVariant::Hayao, ServerConfig::default());
    let png = encoded_image(256, 256, ImageFormat::Png);
    let response = post_upload(app, multipart_body("photo.png", &png, Some("3x"))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(body_text(response).await.contains("unsupported scale"));
}

#[tokio::test]
async fn missing_file_is_rejected() {
    let (app, calls) = build_app(StyleVariant::Hayao, ServerConfig::default());
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"scale\"\r\n\r\n2x\r\n--{BOUNDARY}--\r\n"
    );
    let response = post_upload(app, body.into_bytes()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(body_text(response).await.contains("Missing required"));
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let config = ServerConfig {
        max_upload_mb: 1,
        ..ServerConfig::default()
    };
    let (app, calls) = build_app(StyleVariant::Hayao, config);
    let big = vec![0u8; 2 * 1024 * 1024];
    let response = post_upload(app, multipart_body("photo.png", &big, None)).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
