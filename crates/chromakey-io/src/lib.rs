//! chromakey-io: Browser I/O and Dioxus component library.
//!
//! Talks to the processing service over `fetch`, turns PNG bytes into
//! Blob URLs and downloads, and provides the UI components for the
//! chromakey web application. All decisions about *when* to request and
//! *what* to show live in `chromakey-session`.

pub mod client;
pub mod components;
pub mod download;
pub mod raster;

pub use client::{ClientError, ProcessingClient};
pub use components::{ActionBar, FileUpload, KeyControls, ResultView, StagedCanvas};
