//! PNG Blobs and object URLs.
//!
//! The staged image is displayed from a Blob URL of its PNG bytes rather
//! than an inline `data:` URL, which keeps multi-megabyte strings out of
//! the DOM.

use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur during Blob or object URL creation.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for RasterError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Wrap raw bytes in a `Blob` of the given media type.
///
/// # Errors
///
/// Returns [`RasterError::JsError`] if the `Blob` constructor throws.
pub fn bytes_to_blob(bytes: &[u8], media_type: &str) -> Result<web_sys::Blob, RasterError> {
    let uint8_array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&uint8_array);

    let opts = BlobPropertyBag::new();
    opts.set_type(media_type);
    Ok(web_sys::Blob::new_with_u8_array_sequence_and_options(
        &parts, &opts,
    )?)
}

/// Create an object URL for PNG bytes, for use as an `<img src>`.
///
/// The returned URL must be revoked via [`revoke_blob_url`] when no
/// longer needed.
///
/// # Errors
///
/// Returns [`RasterError::JsError`] if Blob or URL creation fails.
pub fn png_to_blob_url(png: &[u8]) -> Result<String, RasterError> {
    let blob = bytes_to_blob(png, "image/png")?;
    Ok(web_sys::Url::create_object_url_with_blob(&blob)?)
}

/// Revoke an object URL previously created by [`png_to_blob_url`].
///
/// Failures are logged and otherwise ignored.
pub fn revoke_blob_url(url: &str) {
    if let Err(e) = web_sys::Url::revoke_object_url(url) {
        log::debug!("failed to revoke {url}: {e:?}");
    }
}
