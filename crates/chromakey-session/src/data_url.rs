//! `data:` URL encoding for images carried as text.
//!
//! The processing service exchanges images as
//! `data:image/png;base64,<payload>` strings in both directions.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Header prepended to every PNG payload sent or received.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encode PNG bytes as a self-contained `data:` URL.
#[must_use]
pub fn encode_png(png: &[u8]) -> String {
    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + png.len().div_ceil(3) * 4);
    url.push_str(PNG_DATA_URL_PREFIX);
    STANDARD.encode_string(png, &mut url);
    url
}

/// Decode the payload of a `data:` URL back into bytes.
///
/// Everything up to and including the first `,` is treated as the
/// header and skipped. A string without a comma is decoded whole.
///
/// # Errors
///
/// Returns [`base64::DecodeError`] if the payload is not valid
/// standard-alphabet base64.
pub fn decode(url: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let payload = url.split_once(',').map_or(url, |(_, payload)| payload);
    STANDARD.decode(payload.trim())
}
