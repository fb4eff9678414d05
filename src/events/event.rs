//! # Runtime events emitted by the restart controller and scheduler.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Countdown events**: one arm's lifecycle (armed, tick, cancelled, firing)
//! - **Host events**: native restart routine cancelled
//! - **Delivery events**: external notification failures
//!
//! The [`Event`] struct carries additional metadata such as timestamps, arm id,
//! restart reason and seconds left.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Countdown events of one arm are published under the controller lock, so their `seq`
//! order is also their logical order:
//! ```text
//! RestartArmed → RestartTick* (strictly decreasing seconds_left) → RestartCancelled | RestartFiring
//! ```
//!
//! ## Example
//! ```rust
//! use rebootvisor::{Event, EventKind, RestartReason};
//!
//! let ev = Event::new(EventKind::RestartTick)
//!     .with_arm(3)
//!     .with_restart_reason(RestartReason::AdminRequested)
//!     .with_seconds_left(30);
//!
//! assert_eq!(ev.kind, EventKind::RestartTick);
//! assert_eq!(ev.seconds_left, Some(30));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::core::RestartReason;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Countdown events ===
    /// A restart was armed (Init notice).
    ///
    /// Sets:
    /// - `arm`, `reason`, `scheduled_at`
    /// - `seconds_left`: whole seconds until restart at arm time
    RestartArmed,

    /// A checkpoint was reached.
    ///
    /// Sets:
    /// - `arm`, `reason`, `scheduled_at`
    /// - `seconds_left`: the checkpoint value
    RestartTick,

    /// The pending restart was cancelled (explicitly or replaced by a new arm).
    ///
    /// Sets:
    /// - `arm`, `reason`, `scheduled_at`
    RestartCancelled,

    /// The countdown reached zero; clients are being evicted and the host shut down.
    ///
    /// Sets:
    /// - `arm`, `reason`, `scheduled_at`
    RestartFiring,

    // === Host events ===
    /// The host's own restart routine was cancelled on request.
    NativeRestartCancelled,

    // === Delivery events ===
    /// The external sink failed to deliver a notice.
    ///
    /// Sets:
    /// - `arm` (when the notice belonged to an arm)
    /// - `error`: failure message
    ExternalDeliveryFailed,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Arm generation the event belongs to.
    pub arm: Option<u64>,
    /// Why the restart was armed.
    pub reason: Option<RestartReason>,
    /// Seconds left until restart.
    pub seconds_left: Option<u64>,
    /// Absolute restart time.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Human-readable failure details.
    pub error: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            arm: None,
            reason: None,
            seconds_left: None,
            scheduled_at: None,
            error: None,
        }
    }

    /// Attaches the arm generation.
    #[inline]
    pub fn with_arm(mut self, arm: u64) -> Self {
        self.arm = Some(arm);
        self
    }

    /// Attaches the restart reason.
    #[inline]
    pub fn with_restart_reason(mut self, reason: RestartReason) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Attaches seconds left.
    #[inline]
    pub fn with_seconds_left(mut self, secs: u64) -> Self {
        self.seconds_left = Some(secs);
        self
    }

    /// Attaches the absolute restart time.
    #[inline]
    pub fn with_scheduled_at(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_at = Some(at);
        self
    }

    /// Attaches a failure message.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// True for the two events that end an arm.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::RestartCancelled | EventKind::RestartFiring
        )
    }
}
