//! chromakey-session: the interactive staging-and-reprocessing core (sans-IO).
//!
//! Owns the staged image, the sampled reference color, the two tuning
//! parameters, and the protocol for requesting a freshly keyed result
//! after every change:
//!
//! staging -> sampling / slider input -> debounce -> request ->
//! sequence-gated presentation.
//!
//! This crate has **no browser or network dependencies**. Timers and
//! HTTP live in `chromakey-io`; this crate only decides *whether* a
//! timer firing should produce a request and *whether* a response
//! should be shown, so every ordering guarantee is testable natively.

pub mod data_url;
pub mod params;
pub mod presenter;
pub mod protocol;
pub mod sampler;
pub mod scheduler;
pub mod session;
pub mod staging;
pub mod types;

pub use params::ParameterStore;
pub use presenter::{Presentation, ResultPresenter};
pub use protocol::{
    ProcessingFailure, ProcessingOutcome, ProcessingRequest, ProcessingResult, TransportOutcome,
};
pub use sampler::{SampleError, rgb_to_hex};
pub use scheduler::{DEBOUNCE_DELAY_MS, DebounceTicket, ReprocessScheduler, SchedulerState};
pub use session::{DOWNLOAD_FILE_NAME, Session, View};
pub use staging::{StagedImage, StagingError, UploadedFile};
pub use types::{
    Dimensions, DisplayPoint, DisplaySize, Parameters, ReferenceColor, RequestSeq, RgbaImage,
};
