//! Sequence-gated result presentation and the loading indicator.
//!
//! Requests are not serialized against the network: several may be in
//! flight and their responses may arrive in any order. A result is
//! applied only if it belongs to the newest request ever dispatched and
//! has not already been passed by the watermark. Everything else is
//! dropped silently.

use std::sync::Arc;

use crate::protocol::{ProcessingFailure, ProcessingOutcome, ProcessingResult};
use crate::types::RequestSeq;

/// What [`ResultPresenter::on_result`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// A new image replaced the displayed one.
    Applied,
    /// The failure is now shown; the previous image stays displayed.
    Failed,
    /// Superseded by a newer request; nothing changed.
    Stale,
}

/// Displays the newest accepted result.
#[derive(Debug, Default)]
pub struct ResultPresenter {
    /// Highest sequence number dispatched so far.
    latest: RequestSeq,
    /// Highest sequence number resolved (or discarded by a reset).
    watermark: RequestSeq,
    image: Option<Arc<str>>,
    error: Option<ProcessingFailure>,
}

impl ResultPresenter {
    /// Record that request `seq` has been sent.
    ///
    /// Shows the loading indicator and clears any previous failure.
    pub fn on_dispatch(&mut self, seq: RequestSeq) {
        if seq > self.latest {
            self.latest = seq;
        }
        self.error = None;
    }

    /// Apply a result if it is current.
    pub fn on_result(&mut self, result: ProcessingResult) -> Presentation {
        if result.seq != self.latest || result.seq <= self.watermark {
            log::debug!(
                "discarding stale result {} (latest {}, watermark {})",
                result.seq,
                self.latest,
                self.watermark
            );
            return Presentation::Stale;
        }

        self.watermark = result.seq;
        match result.outcome {
            ProcessingOutcome::Succeeded(image) => {
                self.image = Some(image);
                self.error = None;
                Presentation::Applied
            }
            ProcessingOutcome::Failed(failure) => {
                log::warn!("request {} failed: {failure}", result.seq);
                self.error = Some(failure);
                Presentation::Failed
            }
        }
    }

    /// Whether the newest dispatched request is still unresolved.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.latest > self.watermark
    }

    /// The displayed result image (`data:` URL), if any.
    #[must_use]
    pub fn image(&self) -> Option<Arc<str>> {
        self.image.clone()
    }

    /// The failure of the newest request, if it failed.
    #[must_use]
    pub const fn error(&self) -> Option<&ProcessingFailure> {
        self.error.as_ref()
    }

    /// Highest resolved sequence number.
    #[must_use]
    pub const fn watermark(&self) -> RequestSeq {
        self.watermark
    }

    /// Drop the displayed state and discard every request issued so far.
    ///
    /// Responses for those requests arriving later are treated as stale.
    pub fn clear(&mut self) {
        self.watermark = self.latest;
        self.image = None;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(n: u64) -> RequestSeq {
        RequestSeq::new(n)
    }

    fn ok(n: u64, image: &str) -> ProcessingResult {
        ProcessingResult::succeeded(seq(n), image)
    }

    fn failed(n: u64) -> ProcessingResult {
        ProcessingResult::failed(
            seq(n),
            ProcessingFailure::ProcessingFailed("Could not decode image".into()),
        )
    }

    #[test]
    fn idle_presenter_is_not_loading() {
        let presenter = ResultPresenter::default();
        assert!(!presenter.is_loading());
        assert!(presenter.image().is_none());
    }

    #[test]
    fn loading_spans_dispatch_to_resolution() {
        let mut presenter = ResultPresenter::default();
        presenter.on_dispatch(seq(1));
        assert!(presenter.is_loading());
        assert_eq!(presenter.on_result(ok(1, "one")), Presentation::Applied);
        assert!(!presenter.is_loading());
        assert_eq!(presenter.image().as_deref(), Some("one"));
    }

    #[test]
    fn reordered_responses_keep_newest() {
        let mut presenter = ResultPresenter::default();
        presenter.on_dispatch(seq(3));
        presenter.on_dispatch(seq(4));

        assert_eq!(presenter.on_result(ok(4, "four")), Presentation::Applied);
        assert_eq!(presenter.on_result(ok(3, "three")), Presentation::Stale);

        assert_eq!(presenter.image().as_deref(), Some("four"));
        assert_eq!(presenter.watermark(), seq(4));
        assert!(!presenter.is_loading());
    }

    #[test]
    fn older_response_does_not_clear_loading() {
        let mut presenter = ResultPresenter::default();
        presenter.on_dispatch(seq(1));
        presenter.on_dispatch(seq(2));

        assert_eq!(presenter.on_result(ok(1, "one")), Presentation::Stale);
        assert!(presenter.is_loading(), "newest request is still in flight");
        assert!(presenter.image().is_none());

        assert_eq!(presenter.on_result(ok(2, "two")), Presentation::Applied);
        assert!(!presenter.is_loading());
    }

    #[test]
    fn failure_keeps_previous_image_and_clears_loading() {
        let mut presenter = ResultPresenter::default();
        presenter.on_dispatch(seq(1));
        presenter.on_result(ok(1, "one"));

        presenter.on_dispatch(seq(2));
        assert_eq!(presenter.on_result(failed(2)), Presentation::Failed);

        assert!(!presenter.is_loading());
        assert_eq!(presenter.image().as_deref(), Some("one"));
        assert!(presenter.error().is_some());
    }

    #[test]
    fn next_dispatch_clears_failure() {
        let mut presenter = ResultPresenter::default();
        presenter.on_dispatch(seq(1));
        presenter.on_result(failed(1));
        presenter.on_dispatch(seq(2));
        assert!(presenter.error().is_none());
    }

    #[test]
    fn duplicate_result_is_stale() {
        let mut presenter = ResultPresenter::default();
        presenter.on_dispatch(seq(1));
        presenter.on_result(ok(1, "one"));
        assert_eq!(presenter.on_result(ok(1, "again")), Presentation::Stale);
        assert_eq!(presenter.image().as_deref(), Some("one"));
    }

    #[test]
    fn clear_discards_in_flight_results() {
        let mut presenter = ResultPresenter::default();
        presenter.on_dispatch(seq(5));
        presenter.clear();

        assert!(!presenter.is_loading());
        assert_eq!(presenter.on_result(ok(5, "late")), Presentation::Stale);
        assert!(presenter.image().is_none());
    }
}
