//! # LogWriter: restart events as tracing records
//!
//! A minimal subscriber that turns incoming [`Event`]s into structured `tracing`
//! records under the `rebootvisor::events` target.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO rebootvisor::events: restart armed arm=1 reason=AdminRequested remaining=10s at=01/03/2024 - 04:00:10 UTC
//! INFO rebootvisor::events: restart tick arm=1 remaining=5s
//! INFO rebootvisor::events: restart cancelled arm=1 reason=AdminRequested
//! WARN rebootvisor::events: external delivery failed arm=Some(2) err="webhook returned HTTP 500"
//! ```

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    clock::{format_time, format_timestamp},
    events::{Event, EventKind},
    subscribers::Subscribe,
};

const TARGET: &str = "rebootvisor::events";

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let arm = e.arm.unwrap_or_default();
        let reason = e.reason.map(|r| r.as_str()).unwrap_or("none");
        let at = e
            .scheduled_at
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string());

        match e.kind {
            EventKind::RestartArmed => {
                info!(target: TARGET, arm, reason, remaining = %format_time(e.seconds_left), %at, "restart armed");
            }
            EventKind::RestartTick => {
                info!(target: TARGET, arm, remaining = %format_time(e.seconds_left), "restart tick");
            }
            EventKind::RestartCancelled => {
                info!(target: TARGET, arm, reason, "restart cancelled");
            }
            EventKind::RestartFiring => {
                info!(target: TARGET, arm, reason, "restart firing");
            }
            EventKind::NativeRestartCancelled => {
                info!(target: TARGET, "native restart cancelled");
            }
            EventKind::ExternalDeliveryFailed => {
                warn!(
                    target: TARGET,
                    arm = ?e.arm,
                    err = e.error.as_deref().unwrap_or("unknown"),
                    "external delivery failed"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
