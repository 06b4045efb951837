//! HTTP surface: `POST /process` plus optional static hosting of the
//! web client.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chromakey_pipeline::KeyConfig;
use chromakey_pipeline::types::{DEFAULT_COLOR, DEFAULT_SENSITIVITY, DEFAULT_SMOOTHING};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::AppError;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Build the application router from configuration.
pub fn router(config: &Config) -> Router {
    let mut app = Router::new().route("/process", post(process));

    if let Some(dir) = &config.static_dir {
        tracing::info!(dir = %dir.display(), "serving static files");
        app = app.fallback_service(ServeDir::new(dir));
    }

    app = app
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&config.allowed_origins) {
        app = app.layer(cors);
    }
    app
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = o, error = %e, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }
    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

/// A number sent either as JSON number or as numeric text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn resolve(self, field: &'static str) -> Result<f64, AppError> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Text(s) => s.trim().parse().map_err(|e| AppError::InvalidField {
                field,
                reason: format!("{s:?} is not a number ({e})"),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProcessBody {
    image: Option<String>,
    color: Option<String>,
    sensitivity: Option<Numeric>,
    smoothing: Option<Numeric>,
}

#[derive(Debug, Serialize)]
struct ProcessResponse {
    processed_image: String,
}

async fn process(body: Bytes) -> Result<Json<ProcessResponse>, AppError> {
    let body = parse_body(&body)?;

    let image = body
        .image
        .filter(|image| !image.is_empty())
        .ok_or(AppError::NoImage)?;
    let config = KeyConfig {
        color: body.color.unwrap_or_else(|| DEFAULT_COLOR.to_owned()),
        sensitivity: body
            .sensitivity
            .map_or(Ok(DEFAULT_SENSITIVITY), |n| n.resolve("sensitivity"))?,
        smoothing: body
            .smoothing
            .map_or(Ok(DEFAULT_SMOOTHING), |n| n.resolve("smoothing"))?,
    };

    // Drop any `data:...;base64,` header.
    let payload = image.split_once(',').map_or(image.as_str(), |(_, p)| p);
    let bytes = STANDARD.decode(payload.trim())?;

    let start = Instant::now();
    let input_len = bytes.len();
    let (config, keyed) = tokio::task::spawn_blocking(move || {
        let keyed = chromakey_pipeline::process(&bytes, &config);
        (config, keyed)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;
    let keyed = keyed?;

    tracing::info!(
        color = %config.color,
        sensitivity = config.sensitivity,
        smoothing = config.smoothing,
        input_bytes = input_len,
        output_bytes = keyed.len(),
        elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "keyed image",
    );

    let mut processed_image =
        String::with_capacity(PNG_DATA_URL_PREFIX.len() + keyed.len().div_ceil(3) * 4);
    processed_image.push_str(PNG_DATA_URL_PREFIX);
    STANDARD.encode_string(&keyed, &mut processed_image);
    Ok(Json(ProcessResponse { processed_image }))
}

/// Decode the JSON body. Anything that is not a non-empty object counts
/// as no data at all.
fn parse_body(raw: &[u8]) -> Result<ProcessBody, AppError> {
    let value: serde_json::Value = serde_json::from_slice(raw).map_err(|_| AppError::NoData)?;
    match &value {
        serde_json::Value::Object(map) if !map.is_empty() => {}
        _ => return Err(AppError::NoData),
    }
    serde_json::from_value(value).map_err(|e| AppError::InvalidField {
        field: "request body",
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use clap::Parser;
    use http_body_util::BodyExt;
    use image::ImageEncoder;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        router(&Config::parse_from(["chromakey-server"]))
    }

    fn green_screen_url() -> String {
        let img = image::RgbaImage::from_fn(20, 20, |x, y| {
            if (8..12).contains(&x) && (8..12).contains(&y) {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 255, 0, 255])
            }
        });
        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                image::ExtendedColorType::Rgba8,
            )
            .unwrap();
        format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(buf))
    }

    async fn post_process(app: Router, body: impl Into<Body>) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/process")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn keys_out_green() {
        let body = serde_json::json!({
            "image": green_screen_url(),
            "color": "#00FF00",
            "sensitivity": 50,
            "smoothing": 0,
        });
        let (status, json) = post_process(app(), body.to_string()).await;
        assert_eq!(status, StatusCode::OK);

        let url = json["processed_image"].as_str().unwrap();
        let payload = url.strip_prefix(PNG_DATA_URL_PREFIX).unwrap();
        let out = image::load_from_memory(&STANDARD.decode(payload).unwrap())
            .unwrap()
            .to_rgba8();
        assert_eq!(out.get_pixel(0, 0).0[3], 0);
        assert_eq!(out.get_pixel(10, 10).0[3], 255);
    }

    #[tokio::test]
    async fn numeric_strings_and_defaults_are_accepted() {
        let raw = green_screen_url();
        let payload = raw.strip_prefix(PNG_DATA_URL_PREFIX).unwrap();
        let body = serde_json::json!({
            "image": payload,
            "sensitivity": "75",
        });
        let (status, json) = post_process(app(), body.to_string()).await;
        assert_eq!(status, StatusCode::OK, "{json}");
        assert!(json["processed_image"].is_string());
    }

    #[tokio::test]
    async fn out_of_range_parameters_are_clamped() {
        let image = green_screen_url();
        let extremes = [(1e10, 0.0), (-1e10, 0.0), (50.0, 1e6), (-1e10, -1e10)];
        for (sensitivity, smoothing) in extremes {
            let body = serde_json::json!({
                "image": image,
                "sensitivity": sensitivity,
                "smoothing": smoothing,
            });
            let (status, json) = post_process(app(), body.to_string()).await;
            assert_eq!(
                status,
                StatusCode::OK,
                "({sensitivity}, {smoothing}): {json}"
            );

            let url = json["processed_image"].as_str().unwrap();
            let payload = url.strip_prefix(PNG_DATA_URL_PREFIX).unwrap();
            let out = image::load_from_memory(&STANDARD.decode(payload).unwrap())
                .unwrap()
                .to_rgba8();
            assert_eq!(out.dimensions(), (20, 20));
        }
    }

    #[tokio::test]
    async fn empty_body_is_no_data() {
        for body in ["", "{}", "null", "[1]"] {
            let (status, json) = post_process(app(), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
            assert_eq!(json["error"], "No data provided");
        }
    }

    #[tokio::test]
    async fn missing_image_is_rejected() {
        let (status, json) = post_process(app(), r##"{"color":"#00FF00"}"##).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No image provided");

        let (status, _) = post_process(app(), r#"{"image":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_inputs_are_client_errors() {
        let image = green_screen_url();
        for body in [
            serde_json::json!({"image": image, "sensitivity": "lots"}),
            serde_json::json!({"image": image, "color": "green"}),
            serde_json::json!({"image": "data:image/png;base64,!!!"}),
        ] {
            let (status, json) = post_process(app(), body.to_string()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{json}");
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn undecodable_image_is_server_error() {
        let body = serde_json::json!({
            "image": format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(b"not an image")),
        });
        let (status, json) = post_process(app(), body.to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .starts_with("Could not decode image")
        );
    }

    #[test]
    fn cors_ignores_blank_origins() {
        assert!(cors_layer(&[]).is_none());
        assert!(cors_layer(&[" ".into()]).is_none());
        assert!(cors_layer(&["http://localhost:8080".into()]).is_some());
    }
}
