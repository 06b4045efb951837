//! File download via Blob URLs.
//!
//! Dioxus has no built-in file download API.  This module triggers
//! downloads by creating a `Blob`, generating an object URL, and
//! programmatically clicking a temporary `<a>` element.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

use crate::raster::{self, RasterError};

/// Errors that can occur when triggering a file download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Nothing is available to download.
    #[error("no processed image to download")]
    NothingToDownload,

    /// The result could not be decoded back into bytes.
    #[error("processed image is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for DownloadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

impl From<RasterError> for DownloadError {
    fn from(err: RasterError) -> Self {
        match err {
            RasterError::JsError(msg) => Self::JsError(msg),
        }
    }
}

/// Save `bytes` as `filename` through the browser's download flow.
///
/// # Errors
///
/// Returns [`DownloadError::JsError`] if any browser API call fails.
pub fn trigger_download(
    bytes: &[u8],
    filename: &str,
    media_type: &str,
) -> Result<(), DownloadError> {
    let window =
        web_sys::window().ok_or_else(|| DownloadError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| DownloadError::JsError("no document".into()))?;

    let blob = raster::bytes_to_blob(bytes, media_type)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|e| DownloadError::JsError(format!("failed to cast element: {e:?}")))?;
    anchor.set_href(&url);
    anchor.set_download(filename);

    let body = document
        .body()
        .ok_or_else(|| DownloadError::JsError("no document body".into()))?;
    body.append_child(&anchor)?;
    anchor.click();

    // The download has started; cleanup failures are not download failures.
    let _ = body.remove_child(&anchor);
    raster::revoke_blob_url(&url);

    Ok(())
}

/// Save the session's current result as
/// [`DOWNLOAD_FILE_NAME`](chromakey_session::DOWNLOAD_FILE_NAME).
///
/// # Errors
///
/// Returns [`DownloadError::NothingToDownload`] if no result is shown,
/// [`DownloadError::Decode`] if the result is malformed, and
/// [`DownloadError::JsError`] if the browser refuses.
pub fn save_result(session: &chromakey_session::Session) -> Result<(), DownloadError> {
    let png = session
        .download()
        .ok_or(DownloadError::NothingToDownload)??;
    trigger_download(&png, chromakey_session::DOWNLOAD_FILE_NAME, "image/png")
}
