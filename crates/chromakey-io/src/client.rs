//! HTTP client for the processing service.
//!
//! One `fetch` per request, never retried. Whatever happens is reported
//! as a [`TransportOutcome`] and folded into a [`ProcessingResult`] by
//! [`chromakey_session::protocol::interpret`], so the sequence number of
//! the request always travels with its result.

use chromakey_session::protocol::interpret;
use chromakey_session::{ProcessingFailure, ProcessingRequest, ProcessingResult, TransportOutcome};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Endpoint used when `CHROMAKEY_ENDPOINT` is not set at build time.
pub const DEFAULT_ENDPOINT: &str = "/process";

/// Errors from the browser side of an exchange.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A browser API call returned an error or a required object was missing.
    #[error("{0}")]
    JsError(String),
}

impl From<JsValue> for ClientError {
    fn from(value: JsValue) -> Self {
        // Prefer the JS error message over the debug dump when there is one.
        let message = value
            .dyn_ref::<js_sys::Error>()
            .map_or_else(|| format!("{value:?}"), |e| String::from(e.message()));
        Self::JsError(message)
    }
}

/// Sends [`ProcessingRequest`]s to the processing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingClient {
    endpoint: &'static str,
}

impl Default for ProcessingClient {
    fn default() -> Self {
        Self::new(option_env!("CHROMAKEY_ENDPOINT").unwrap_or(DEFAULT_ENDPOINT))
    }
}

impl ProcessingClient {
    /// A client posting to `endpoint`.
    #[must_use]
    pub const fn new(endpoint: &'static str) -> Self {
        Self { endpoint }
    }

    /// The URL requests are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    /// Perform one request/response exchange.
    ///
    /// Never fails: every outcome, including a network error, becomes a
    /// [`ProcessingResult`] tagged with `request.seq`.
    #[allow(clippy::future_not_send)] // WASM is single-threaded; JsFuture is !Send
    pub async fn send(self, request: &ProcessingRequest) -> ProcessingResult {
        let body = match request.to_json() {
            Ok(body) => body,
            Err(e) => {
                return ProcessingResult::failed(
                    request.seq,
                    ProcessingFailure::ProcessingFailed(e.to_string()),
                );
            }
        };

        let outcome = match self.exchange(&body).await {
            Ok(outcome) => outcome,
            Err(e) => TransportOutcome::Unreachable(e.to_string()),
        };
        if let TransportOutcome::Completed { status, .. } = &outcome {
            log::debug!("request {} answered with HTTP {status}", request.seq);
        }
        interpret(request.seq, outcome)
    }

    #[allow(clippy::future_not_send)]
    async fn exchange(self, body: &str) -> Result<TransportOutcome, ClientError> {
        let window =
            web_sys::window().ok_or_else(|| ClientError::JsError("no global window".into()))?;

        let headers = web_sys::Headers::new()?;
        headers.set("Content-Type", "application/json")?;

        let init = web_sys::RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(body));

        let request = web_sys::Request::new_with_str_and_init(self.endpoint, &init)?;
        let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
            .await?
            .dyn_into()?;

        let status = response.status();
        let text = JsFuture::from(response.text()?).await?;
        Ok(TransportOutcome::Completed {
            status,
            body: text.as_string().unwrap_or_default(),
        })
    }
}
