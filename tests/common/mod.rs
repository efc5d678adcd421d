#![allow(dead_code)]

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use base64::Engine as _;
use serde_json::{json, Value};
use std::io::Cursor;

pub const TOKEN: &str = "test-token";

/// Encode a 4x4 single-colour PNG.
pub fn solid_png(rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb(rgb));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageOutputFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Stand-in for the Vertex AI predict endpoint.
///
/// The embedding is the mean colour of the image scaled to [0, 1]. Mostly
/// green images are rejected the way the real service rejects bad input.
async fn predict(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let expected = format!("Bearer {}", TOKEN);
    if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"code": 401, "message": "Request had invalid authentication credentials."}})),
        );
    }

    let encoded = body["instances"][0]["image"]["bytesBase64Encoded"]
        .as_str()
        .unwrap_or_default();
    let Ok(bytes) = base64::engine::general_purpose::STANDARD.decode(encoded) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": {"message": "bad base64"}})));
    };
    let Ok(img) = image::load_from_memory(&bytes) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": {"message": "Invalid image"}})));
    };

    let rgb = img.to_rgb8();
    let count = (rgb.width() * rgb.height()) as f64;
    let mut mean = [0.0f64; 3];
    for pixel in rgb.pixels() {
        for (acc, channel) in mean.iter_mut().zip(pixel.0) {
            *acc += channel as f64 / 255.0 / count;
        }
    }

    if mean[1] > 0.9 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": 400, "message": "Invalid image content"}})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "predictions": [{"imageEmbedding": mean}],
            "deployedModelId": "fake"
        })),
    )
}

/// Always answers 429.
async fn exhausted() -> (StatusCode, &'static str) {
    (StatusCode::TOO_MANY_REQUESTS, "Quota exceeded for aiplatform.googleapis.com")
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/predict", addr)
}

/// Start a fake embedding service and return its predict URL.
pub async fn spawn_fake_service() -> String {
    serve(Router::new().route("/predict", post(predict))).await
}

/// Start a service that rejects every request for quota reasons.
pub async fn spawn_exhausted_service() -> String {
    serve(Router::new().route("/predict", post(exhausted))).await
}

pub fn service_config(endpoint: &str) -> lookalike::ServiceConfig {
    lookalike::ServiceConfig {
        access_token: Some(TOKEN.to_string()),
        ..lookalike::ServiceConfig::with_endpoint(endpoint)
    }
}

/// Build a multipart/form-data body; returns (content type, body).
pub fn multipart_body(parts: &[(&str, &str, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "lookalike-test-boundary";
    let mut body = Vec::new();
    for (field, file_name, data) in parts {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}
