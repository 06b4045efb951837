//! Trailing-edge debounce and request sequencing.
//!
//! The scheduler does not own a timer. [`ReprocessScheduler::trigger`]
//! hands out a [`DebounceTicket`] and the I/O layer sleeps for
//! [`DEBOUNCE_DELAY_MS`] before presenting it back to
//! [`ReprocessScheduler::fire`]. Only the most recently issued ticket
//! fires, so a burst of triggers collapses into a single request even if
//! the host fails to cancel an earlier sleep.
//!
//! ```text
//! Idle --trigger--> Pending --trigger--> Pending (re-armed)
//!                      |
//!                    fire(current ticket) -> request issued -> Idle
//! ```

use crate::types::RequestSeq;

/// Quiet period after the last trigger before a request is issued.
pub const DEBOUNCE_DELAY_MS: u32 = 200;

/// Identifies one arming of the debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// Whether a debounce window is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No timer armed.
    Idle,
    /// A timer is armed and has not fired yet.
    Pending,
}

/// Coalesces triggers and assigns sequence numbers to issued requests.
#[derive(Debug, Default)]
pub struct ReprocessScheduler {
    arms: u64,
    armed: Option<DebounceTicket>,
    last_issued: RequestSeq,
}

impl ReprocessScheduler {
    /// Arm (or re-arm) the debounce timer.
    ///
    /// Any previously issued ticket is superseded and will not fire.
    pub fn trigger(&mut self) -> DebounceTicket {
        self.arms += 1;
        let ticket = DebounceTicket(self.arms);
        self.armed = Some(ticket);
        ticket
    }

    /// Disarm the pending timer, if any.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Consume a ticket whose delay has elapsed.
    ///
    /// Returns the sequence number of the new request, or `None` if the
    /// ticket was superseded or cancelled.
    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<RequestSeq> {
        if self.armed != Some(ticket) {
            return None;
        }
        self.armed = None;
        self.last_issued = self.last_issued.next();
        Some(self.last_issued)
    }

    /// Current debounce state.
    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        if self.armed.is_some() {
            SchedulerState::Pending
        } else {
            SchedulerState::Idle
        }
    }

    /// Sequence number of the most recently issued request (zero if none).
    #[must_use]
    pub const fn last_issued(&self) -> RequestSeq {
        self.last_issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let scheduler = ReprocessScheduler::default();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.last_issued(), RequestSeq::default());
    }

    #[test]
    fn burst_fires_once_for_last_ticket() {
        let mut scheduler = ReprocessScheduler::default();
        let tickets: Vec<_> = (0..10).map(|_| scheduler.trigger()).collect();
        assert_eq!(scheduler.state(), SchedulerState::Pending);

        for &stale in &tickets[..9] {
            assert_eq!(scheduler.fire(stale), None);
        }
        assert_eq!(scheduler.fire(tickets[9]), Some(RequestSeq::new(1)));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn ticket_fires_at_most_once() {
        let mut scheduler = ReprocessScheduler::default();
        let ticket = scheduler.trigger();
        assert!(scheduler.fire(ticket).is_some());
        assert_eq!(scheduler.fire(ticket), None);
    }

    #[test]
    fn sequence_increases_across_windows() {
        let mut scheduler = ReprocessScheduler::default();
        let first = scheduler.trigger();
        let a = scheduler.fire(first);
        let second = scheduler.trigger();
        let b = scheduler.fire(second);
        assert_eq!(a, Some(RequestSeq::new(1)));
        assert_eq!(b, Some(RequestSeq::new(2)));
        assert_eq!(scheduler.last_issued(), RequestSeq::new(2));
    }

    #[test]
    fn cancel_disarms() {
        let mut scheduler = ReprocessScheduler::default();
        let ticket = scheduler.trigger();
        scheduler.cancel();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.fire(ticket), None);
        assert_eq!(scheduler.last_issued(), RequestSeq::default());
    }
}
