//! Request/response contract with the processing service.
//!
//! A [`ProcessingRequest`] is an immutable snapshot taken when the
//! debounce window closes. Whatever happens on the wire is reported back
//! as a [`TransportOutcome`] and folded by [`interpret`] into a
//! [`ProcessingResult`] tagged with the request's sequence number.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{Parameters, ReferenceColor, RequestSeq};

/// Snapshot of everything the processing service needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingRequest {
    /// Sequence number assigned when the request was created.
    pub seq: RequestSeq,
    /// The staged image as a `data:` URL.
    pub image: Arc<str>,
    /// Reference color to key out.
    pub color: ReferenceColor,
    /// Tuning parameters in effect at creation time.
    pub parameters: Parameters,
}

impl ProcessingRequest {
    /// JSON body posted to the service.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&RequestBody {
            image: &self.image,
            color: self.color.hex(),
            sensitivity: self.parameters.sensitivity,
            smoothing: self.parameters.smoothing,
        })
    }
}

/// Wire form of a processing request.
#[derive(Serialize)]
struct RequestBody<'a> {
    image: &'a str,
    color: String,
    sensitivity: u32,
    smoothing: u32,
}

/// Wire form of a processing response.
///
/// The service sets exactly one of the two fields.
#[derive(Debug, Default, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    processed_image: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Why a request produced no image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessingFailure {
    /// The service answered with an error or a non-success status.
    #[error("Error processing image: {0}")]
    ProcessingFailed(String),

    /// The service could not be reached at all.
    #[error("Failed to connect to server: {0}")]
    TransportUnavailable(String),
}

/// Outcome of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// The service returned a keyed image (`data:` URL).
    Succeeded(Arc<str>),
    /// The request failed.
    Failed(ProcessingFailure),
}

/// A [`ProcessingOutcome`] tagged with the sequence number of the request
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingResult {
    /// Sequence number of the originating request.
    pub seq: RequestSeq,
    /// What happened.
    pub outcome: ProcessingOutcome,
}

impl ProcessingResult {
    /// A successful result.
    #[must_use]
    pub fn succeeded(seq: RequestSeq, image: impl Into<Arc<str>>) -> Self {
        Self {
            seq,
            outcome: ProcessingOutcome::Succeeded(image.into()),
        }
    }

    /// A failed result.
    #[must_use]
    pub const fn failed(seq: RequestSeq, failure: ProcessingFailure) -> Self {
        Self {
            seq,
            outcome: ProcessingOutcome::Failed(failure),
        }
    }
}

/// What the transport observed for one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    /// The request never completed (network error, CORS, offline...).
    Unreachable(String),
    /// A response arrived.
    Completed {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },
}

/// Map a transport outcome into a result for request `seq`.
///
/// Never retries: a failure is simply reported.
#[must_use]
pub fn interpret(seq: RequestSeq, outcome: TransportOutcome) -> ProcessingResult {
    let (status, body) = match outcome {
        TransportOutcome::Unreachable(reason) => {
            return ProcessingResult::failed(seq, ProcessingFailure::TransportUnavailable(reason));
        }
        TransportOutcome::Completed { status, body } => (status, body),
    };

    let parsed = serde_json::from_str::<ResponseBody>(&body);

    if !(200..300).contains(&status) {
        // Keep the service's own message when the error body is readable.
        let detail = parsed
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("service responded with HTTP {status}"));
        return ProcessingResult::failed(seq, ProcessingFailure::ProcessingFailed(detail));
    }

    match parsed {
        Ok(ResponseBody {
            processed_image: Some(image),
            ..
        }) if !image.is_empty() => ProcessingResult::succeeded(seq, image),
        Ok(ResponseBody {
            error: Some(error), ..
        }) => ProcessingResult::failed(seq, ProcessingFailure::ProcessingFailed(error)),
        Ok(_) => ProcessingResult::failed(
            seq,
            ProcessingFailure::ProcessingFailed("response carried no image".into()),
        ),
        Err(e) => ProcessingResult::failed(
            seq,
            ProcessingFailure::ProcessingFailed(format!("malformed response: {e}")),
        ),
    }
}
