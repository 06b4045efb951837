use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chromakey_pipeline::KeyError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No data provided")]
    NoData,

    #[error("No image provided")]
    NoImage,

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Invalid image data: {0}")]
    InvalidImageData(#[from] base64::DecodeError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// `{"error": "..."}`
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NoData
            | Self::NoImage
            | Self::InvalidField { .. }
            | Self::InvalidImageData(_)
            | Self::Key(KeyError::InvalidColor(_) | KeyError::InvalidParameter { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Key(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "processing failed");
        } else {
            tracing::warn!(error = %self, "rejected request");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
