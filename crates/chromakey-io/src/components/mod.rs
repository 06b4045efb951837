//! Dioxus UI components for chromakey.
//!
//! Provides the drop target, the clickable staged canvas, the color and
//! slider controls, the result view with its loading overlay, and the
//! download/reset action bar.

mod actions;
mod controls;
mod result_view;
mod staged_canvas;
mod upload;

pub use actions::ActionBar;
pub use controls::KeyControls;
pub use result_view::ResultView;
pub use staged_canvas::StagedCanvas;
pub use upload::FileUpload;
