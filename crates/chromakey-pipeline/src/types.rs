//! Configuration and error types for the keying pipeline.

use serde::{Deserialize, Serialize};

/// Default key color when a request does not name one.
pub const DEFAULT_COLOR: &str = "#00FF00";

/// Default sensitivity when a request does not name one.
pub const DEFAULT_SENSITIVITY: f64 = 50.0;

/// Default smoothing when a request does not name one.
pub const DEFAULT_SMOOTHING: f64 = 0.0;

/// Upper bound of sensitivity and smoothing. Values outside
/// `0..=PARAMETER_MAX` are clamped before use.
pub const PARAMETER_MAX: f64 = 100.0;

/// Clamp a tuning parameter into `0..=PARAMETER_MAX`.
#[must_use]
pub const fn clamp_parameter(value: f64) -> f64 {
    value.clamp(0.0, PARAMETER_MAX)
}

/// Parameters for one keying run.
///
/// Numeric fields are floats because the HTTP front end accepts any JSON
/// number (or numeric string); the pipeline truncates them where the
/// algorithm needs integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Key color as `#RRGGBB` (the leading `#` is optional).
    pub color: String,

    /// How far from the key color a pixel may be and still be removed.
    /// Clamped to `0..=100`.
    pub sensitivity: f64,

    /// Edge feathering strength. Zero disables blurring of the mask.
    /// Clamped to `0..=100`.
    pub smoothing: f64,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_owned(),
            sensitivity: DEFAULT_SENSITIVITY,
            smoothing: DEFAULT_SMOOTHING,
        }
    }
}

/// Errors from the keying pipeline.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Failed to decode the input image.
    #[error("Could not decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The key color is not a `#RRGGBB` string.
    #[error("invalid key color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    /// A numeric parameter is NaN or infinite.
    #[error("invalid {name}: {value}")]
    InvalidParameter {
        /// Which parameter was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// PNG encoding of the keyed image failed.
    #[error("Could not encode image: {0}")]
    Encode(String),
}
