//! The staging controller: one value that owns the whole interactive
//! state and enforces its lifecycle.
//!
//! ```text
//! (no image) --stage--> (staged) --reset--> (no image)
//!                          |  ^
//!                          +--+ stage (replaces: reset, then stage)
//! ```
//!
//! The UI holds a single [`Session`], mutates it from event handlers,
//! and asks it for everything it renders.

use std::sync::Arc;

use crate::data_url;
use crate::params::ParameterStore;
use crate::presenter::{Presentation, ResultPresenter};
use crate::protocol::{ProcessingFailure, ProcessingRequest, ProcessingResult};
use crate::sampler::{self, SampleError};
use crate::scheduler::{DebounceTicket, ReprocessScheduler, SchedulerState};
use crate::staging::{StagedImage, StagingError, UploadedFile};
use crate::types::{DisplayPoint, DisplaySize, Parameters, ReferenceColor};

/// File name used when saving the keyed result.
pub const DOWNLOAD_FILE_NAME: &str = "processed_image.png";

/// Which major view is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Nothing staged: show the drop target.
    DropTarget,
    /// An image is staged: show the workspace.
    Workspace,
}

/// The interactive keying session.
#[derive(Debug, Default)]
pub struct Session {
    staged: Option<StagedImage>,
    store: ParameterStore,
    scheduler: ReprocessScheduler,
    presenter: ResultPresenter,
}

impl Session {
    /// A session with nothing staged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an uploaded file, replacing any current workspace.
    ///
    /// The file is validated and decoded before anything changes, so a
    /// rejected upload leaves the session exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns a [`StagingError`] if the file is not an image or cannot
    /// be decoded.
    pub fn stage(&mut self, file: &UploadedFile) -> Result<&StagedImage, StagingError> {
        let staged = StagedImage::decode(file)?;
        self.reset();
        let dims = staged.dimensions();
        log::info!("staged {} ({}x{})", staged.name(), dims.width, dims.height);
        Ok(self.staged.insert(staged))
    }

    /// Return to the pre-upload state.
    ///
    /// Discards the staged image, restores default color and parameters,
    /// disarms any pending debounce, and discards every in-flight request.
    pub fn reset(&mut self) {
        self.staged = None;
        self.store.reset();
        self.scheduler.cancel();
        self.presenter.clear();
    }

    /// Which major view should be visible.
    #[must_use]
    pub const fn view(&self) -> View {
        if self.staged.is_some() {
            View::Workspace
        } else {
            View::DropTarget
        }
    }

    /// The staged image, if any.
    #[must_use]
    pub const fn staged(&self) -> Option<&StagedImage> {
        self.staged.as_ref()
    }

    /// Sample the reference color at a click on the staged canvas.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::NotStaged`] if nothing is staged and
    /// [`SampleError::OutOfBounds`] if the click maps outside the image.
    pub fn sample_at(
        &mut self,
        point: DisplayPoint,
        displayed: DisplaySize,
    ) -> Result<ReferenceColor, SampleError> {
        let staged = self.staged.as_ref().ok_or(SampleError::NotStaged)?;
        let color = sampler::sample_at(staged.pixels(), point, displayed)?;
        Ok(self.store.set_color(color))
    }

    /// Update the sensitivity slider value.
    pub fn set_sensitivity(&mut self, value: u32) -> Parameters {
        self.store.set_sensitivity(value)
    }

    /// Update the smoothing slider value.
    pub fn set_smoothing(&mut self, value: u32) -> Parameters {
        self.store.set_smoothing(value)
    }

    /// Current reference color.
    #[must_use]
    pub const fn color(&self) -> ReferenceColor {
        self.store.color()
    }

    /// Current tuning parameters.
    #[must_use]
    pub const fn parameters(&self) -> Parameters {
        self.store.parameters()
    }

    /// Request reprocessing after the debounce delay.
    ///
    /// Returns `None` (and arms nothing) when no image is staged.
    pub fn trigger(&mut self) -> Option<DebounceTicket> {
        self.staged.as_ref()?;
        Some(self.scheduler.trigger())
    }

    /// Whether a debounce window is open.
    #[must_use]
    pub const fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// The debounce delay for `ticket` has elapsed.
    ///
    /// Returns the request to send, or `None` if the ticket was
    /// superseded, the session was reset, or nothing is staged.
    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<ProcessingRequest> {
        let Some(staged) = self.staged.as_ref() else {
            self.scheduler.cancel();
            return None;
        };
        let seq = self.scheduler.fire(ticket)?;
        self.presenter.on_dispatch(seq);

        let request = ProcessingRequest {
            seq,
            image: staged.encoded(),
            color: self.store.color(),
            parameters: self.store.parameters(),
        };
        log::debug!(
            "dispatching request {seq}: color {}, sensitivity {}, smoothing {}",
            request.color,
            request.parameters.sensitivity,
            request.parameters.smoothing
        );
        Some(request)
    }

    /// Hand a result to the presenter.
    pub fn on_result(&mut self, result: ProcessingResult) -> Presentation {
        self.presenter.on_result(result)
    }

    /// Whether the loading indicator should be visible.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.presenter.is_loading()
    }

    /// The displayed result (`data:` URL), if any.
    #[must_use]
    pub fn result(&self) -> Option<Arc<str>> {
        self.presenter.image()
    }

    /// The failure of the newest request, if it failed.
    #[must_use]
    pub const fn error(&self) -> Option<&ProcessingFailure> {
        self.presenter.error()
    }

    /// PNG bytes of the displayed result, for saving as
    /// [`DOWNLOAD_FILE_NAME`].
    ///
    /// Returns `None` when no result is displayed.
    #[must_use]
    pub fn download(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.presenter.image().map(|url| data_url::decode(&url))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::ImageEncoder;

    use super::*;
    use crate::protocol::{ProcessingOutcome, TransportOutcome, interpret};
    use crate::types::{Dimensions, RequestSeq, RgbaImage};

    /// 800x600 PNG: left half pure green, right half white, with a red
    /// pixel at (200, 300).
    fn test_upload() -> UploadedFile {
        let img = RgbaImage::from_fn(800, 600, |x, y| {
            if (x, y) == (200, 300) {
                image::Rgba([255, 0, 0, 255])
            } else if x < 400 {
                image::Rgba([0, 255, 0, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        });
        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                image::ExtendedColorType::Rgba8,
            )
            .unwrap();
        UploadedFile::from_name("screen.png".into(), buf)
    }

    fn staged_session() -> Session {
        let mut session = Session::new();
        session.stage(&test_upload()).unwrap();
        session
    }

    const HALF: DisplaySize = DisplaySize::new(400.0, 300.0);

    #[test]
    fn starts_on_drop_target() {
        let session = Session::new();
        assert_eq!(session.view(), View::DropTarget);
        assert!(!session.is_loading());
        assert_eq!(session.color(), ReferenceColor::DEFAULT);
    }

    #[test]
    fn staging_shows_workspace() {
        let session = staged_session();
        assert_eq!(session.view(), View::Workspace);
        assert_eq!(
            session.staged().unwrap().dimensions(),
            Dimensions {
                width: 800,
                height: 600
            }
        );
    }

    #[test]
    fn non_image_upload_changes_nothing() {
        let mut session = Session::new();
        let text = UploadedFile::from_name("notes.txt".into(), b"plain".to_vec());
        assert!(matches!(
            session.stage(&text),
            Err(StagingError::RejectedInput { .. })
        ));
        assert_eq!(session.view(), View::DropTarget);
        assert!(session.trigger().is_none(), "no request may be armed");
    }

    #[test]
    fn rejected_upload_keeps_existing_workspace() {
        let mut session = staged_session();
        session.set_sensitivity(80);
        let text = UploadedFile {
            name: "clip.mp4".into(),
            media_type: "video/mp4".into(),
            bytes: vec![0, 1, 2],
        };
        assert!(session.stage(&text).is_err());
        assert_eq!(session.view(), View::Workspace);
        assert_eq!(session.parameters().sensitivity, 80);
    }

    #[test]
    fn click_samples_scaled_pixel() {
        let mut session = staged_session();
        let color = session
            .sample_at(DisplayPoint::new(100.0, 150.0), HALF)
            .unwrap();
        assert_eq!(color.hex(), "#FF0000");
        assert_eq!(session.color(), color);
    }

    #[test]
    fn out_of_bounds_click_keeps_color() {
        let mut session = staged_session();
        let err = session
            .sample_at(DisplayPoint::new(500.0, 10.0), HALF)
            .unwrap_err();
        assert!(matches!(err, SampleError::OutOfBounds { .. }));
        assert_eq!(session.color(), ReferenceColor::DEFAULT);
    }

    #[test]
    fn rapid_mutations_dispatch_one_request_with_final_values() {
        let mut session = staged_session();
        let mut tickets = vec![session.trigger().unwrap()];

        session.set_sensitivity(10);
        tickets.push(session.trigger().unwrap());
        session
            .sample_at(DisplayPoint::new(300.0, 10.0), HALF)
            .unwrap();
        tickets.push(session.trigger().unwrap());
        session.set_smoothing(35);
        tickets.push(session.trigger().unwrap());
        session.set_sensitivity(90);
        tickets.push(session.trigger().unwrap());

        // Every superseded timer fires into nothing.
        let (last, stale) = tickets.split_last().unwrap();
        for &ticket in stale {
            assert!(session.fire(ticket).is_none());
        }

        let request = session.fire(*last).unwrap();
        assert_eq!(request.seq, RequestSeq::new(1));
        assert_eq!(request.color.hex(), "#FFFFFF");
        assert_eq!(
            request.parameters,
            Parameters {
                sensitivity: 90,
                smoothing: 35
            }
        );
        assert_eq!(request.image, session.staged().unwrap().encoded());
        assert_eq!(session.scheduler_state(), SchedulerState::Idle);
    }

    #[test]
    fn out_of_order_responses_settle_on_newest() {
        let mut session = staged_session();

        let mut requests = Vec::new();
        for _ in 0..4 {
            let ticket = session.trigger().unwrap();
            requests.push(session.fire(ticket).unwrap());
        }
        let third = &requests[2];
        let fourth = &requests[3];
        assert_eq!(third.seq, RequestSeq::new(3));
        assert_eq!(fourth.seq, RequestSeq::new(4));

        let body = |name: &str| TransportOutcome::Completed {
            status: 200,
            body: format!(r#"{{"processed_image":"data:image/png;base64,{name}"}}"#),
        };

        assert_eq!(
            session.on_result(interpret(fourth.seq, body("Zm91cg=="))),
            Presentation::Applied
        );
        assert_eq!(
            session.on_result(interpret(third.seq, body("dGhyZWU="))),
            Presentation::Stale
        );
        assert_eq!(
            session.result().as_deref(),
            Some("data:image/png;base64,Zm91cg==")
        );
        assert_eq!(session.download().unwrap().unwrap(), b"four");
        assert!(!session.is_loading());
    }

    #[test]
    fn loading_visible_only_while_newest_is_unresolved() {
        let mut session = staged_session();
        assert!(!session.is_loading());

        let ticket = session.trigger().unwrap();
        assert!(!session.is_loading(), "debounce window alone is not loading");

        let request = session.fire(ticket).unwrap();
        assert!(session.is_loading());

        let result = interpret(
            request.seq,
            TransportOutcome::Unreachable("connection refused".into()),
        );
        assert_eq!(session.on_result(result), Presentation::Failed);
        assert!(!session.is_loading());
        assert!(matches!(
            session.error(),
            Some(ProcessingFailure::TransportUnavailable(_))
        ));
    }

    #[test]
    fn failure_leaves_previous_result_displayed() {
        let mut session = staged_session();
        let first = session.trigger().and_then(|t| session.fire(t)).unwrap();
        session.on_result(ProcessingResult::succeeded(first.seq, "data:,AAAA"));

        let second = session.trigger().and_then(|t| session.fire(t)).unwrap();
        let outcome = session.on_result(interpret(
            second.seq,
            TransportOutcome::Completed {
                status: 500,
                body: r#"{"error":"Could not encode image"}"#.into(),
            },
        ));
        assert_eq!(outcome, Presentation::Failed);
        assert_eq!(session.result().as_deref(), Some("data:,AAAA"));
    }

    #[test]
    fn reset_before_restage_is_inert() {
        let mut session = staged_session();
        session.set_smoothing(40);
        session.reset();

        assert_eq!(session.view(), View::DropTarget);
        assert_eq!(
            session.sample_at(DisplayPoint::new(1.0, 1.0), HALF),
            Err(SampleError::NotStaged)
        );
        assert!(session.trigger().is_none());
        assert_eq!(session.parameters(), Parameters::default());
        assert!(session.result().is_none());
        assert!(session.download().is_none());
    }

    #[test]
    fn reset_discards_pending_timer_and_in_flight_request() {
        let mut session = staged_session();
        let sent = session.trigger().and_then(|t| session.fire(t)).unwrap();
        let pending = session.trigger().unwrap();

        session.reset();
        assert!(!session.is_loading());
        assert!(session.fire(pending).is_none());

        session.stage(&test_upload()).unwrap();
        assert_eq!(
            session.on_result(ProcessingResult::succeeded(sent.seq, "data:,old")),
            Presentation::Stale
        );
        assert!(session.result().is_none());

        // Numbering continues after a reset.
        let next = session.trigger().and_then(|t| session.fire(t)).unwrap();
        assert_eq!(next.seq, RequestSeq::new(2));
        assert!(matches!(
            session.on_result(ProcessingResult::succeeded(next.seq, "data:,new")),
            Presentation::Applied
        ));
    }

    #[test]
    fn second_upload_replaces_workspace() {
        let mut session = staged_session();
        session
            .sample_at(DisplayPoint::new(300.0, 10.0), HALF)
            .unwrap();
        let first = session.trigger().and_then(|t| session.fire(t)).unwrap();
        session.on_result(ProcessingResult::succeeded(first.seq, "data:,AAAA"));

        session.stage(&test_upload()).unwrap();
        assert_eq!(session.view(), View::Workspace);
        assert_eq!(session.color(), ReferenceColor::DEFAULT);
        assert!(session.result().is_none());
    }

    #[test]
    fn result_outcome_is_tagged() {
        let mut session = staged_session();
        let request = session.trigger().and_then(|t| session.fire(t)).unwrap();
        let result = interpret(
            request.seq,
            TransportOutcome::Completed {
                status: 200,
                body: r#"{"error":"boom"}"#.into(),
            },
        );
        assert_eq!(result.seq, request.seq);
        assert!(matches!(result.outcome, ProcessingOutcome::Failed(_)));
    }
}
