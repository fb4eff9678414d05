//! # Notifier: fan-out of countdown transitions.
//!
//! The controller calls the [`Notifier`] at every transition of an arm, while it
//! holds the restart state lock. The notifier forwards the transition to up to
//! three independent channels:
//!
//! ```text
//!                      ┌──► Bus::publish(Event)                           (always)
//! Controller ──► Notifier ──► Host::broadcast(message, avatar)            (init / tick / cancelled)
//!                      └──► try_send ──► [queue] ──► delivery worker      (if enabled: init / final / cancelled)
//!                                                       └─► ExternalSink::deliver (one at a time)
//! ```
//!
//! ## Rules
//! - Nothing here blocks: bus publishing and host broadcast are synchronous and
//!   cheap, external notices are queued with `try_send` and never awaited.
//! - A single worker delivers external notices in queue order, so the sink sees an
//!   arm's Init before its Cancelled and a replaced arm's Cancelled before the next
//!   arm's Init, whatever the latency of each delivery.
//! - External failures (and panics inside the sink) are logged and published as
//!   `ExternalDeliveryFailed`; they never reach the controller and are never retried.
//! - A full delivery queue drops the notice with a warning.
//! - Whether a tick carries the external final notice is decided by the controller
//!   (it owns the once-per-arm flag).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{
    clock::format_time,
    core::RestartReason,
    events::{Bus, Event, EventKind},
    host::Host,
    notify::{
        messages::Messages,
        sink::{ExternalNotice, ExternalSink, NoticeStatus},
    },
};

/// Snapshot of one arm at a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Notice {
    pub arm: u64,
    pub reason: RestartReason,
    pub scheduled_at: DateTime<Utc>,
    pub seconds_left: Option<u64>,
}

impl Notice {
    fn event(&self, kind: EventKind) -> Event {
        let ev = Event::new(kind)
            .with_arm(self.arm)
            .with_restart_reason(self.reason)
            .with_scheduled_at(self.scheduled_at);
        match self.seconds_left {
            Some(secs) => ev.with_seconds_left(secs),
            None => ev,
        }
    }
}

/// Capacity of the external delivery queue.
pub(crate) const DELIVERY_QUEUE_CAPACITY: usize = 64;

/// Queue into the delivery worker of the attached sink.
struct External {
    tx: mpsc::Sender<ExternalNotice>,
    sink: &'static str,
    enabled: bool,
}

/// Fan-out to bus, in-process broadcast and external sink.
pub(crate) struct Notifier {
    bus: Bus,
    host: Arc<dyn Host>,
    messages: Arc<Messages>,
    avatar_id: u64,
    external: Option<External>,
}

impl Notifier {
    /// Creates a notifier without external sink.
    pub(crate) fn new(
        bus: Bus,
        host: Arc<dyn Host>,
        messages: Arc<Messages>,
        avatar_id: u64,
    ) -> Self {
        Self {
            bus,
            host,
            messages,
            avatar_id,
            external: None,
        }
    }

    /// Attaches an external sink and spawns its delivery worker. `enabled` gates
    /// countdown notices; operator test notices go through regardless.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn with_external(mut self, sink: Arc<dyn ExternalSink>, enabled: bool) -> Self {
        let (tx, rx) = mpsc::channel(DELIVERY_QUEUE_CAPACITY);
        let name = sink.name();
        tokio::spawn(delivery_worker(sink, rx, self.bus.clone()));
        self.external = Some(External {
            tx,
            sink: name,
            enabled,
        });
        self
    }

    /// True if countdown notices reach the external sink.
    #[inline]
    pub(crate) fn external_enabled(&self) -> bool {
        self.external.as_ref().is_some_and(|e| e.enabled)
    }

    pub(crate) fn init(&self, n: &Notice) {
        self.bus.publish(n.event(EventKind::RestartArmed));
        if self.external_enabled() {
            self.dispatch(NoticeStatus::Initialized, Some(n));
        }
        let duration = format_time(n.seconds_left);
        self.broadcast(&self.messages.restart_global(&duration, n.reason.as_str()));
    }

    pub(crate) fn tick(&self, n: &Notice, final_notice: bool) {
        self.bus.publish(n.event(EventKind::RestartTick));
        let duration = format_time(n.seconds_left);
        self.broadcast(&self.messages.restart_global_short(&duration));
        if final_notice {
            self.dispatch(NoticeStatus::Now, Some(n));
        }
    }

    pub(crate) fn cancelled(&self, n: &Notice) {
        self.bus.publish(n.event(EventKind::RestartCancelled));
        if self.external_enabled() {
            self.dispatch(NoticeStatus::Canceled, Some(n));
        }
        self.broadcast(&self.messages.restart_cancel);
    }

    pub(crate) fn firing(&self, n: &Notice) {
        self.bus.publish(n.event(EventKind::RestartFiring));
    }

    /// Sends the operator test notice. Returns `false` when no sink is attached.
    pub(crate) fn test(&self, pending: Option<&Notice>) -> bool {
        if self.external.is_none() {
            return false;
        }
        self.dispatch(NoticeStatus::Test, pending);
        true
    }

    fn broadcast(&self, message: &str) {
        info!(avatar = self.avatar_id, "{message}");
        self.host.broadcast(message, self.avatar_id);
    }

    fn dispatch(&self, status: NoticeStatus, n: Option<&Notice>) {
        let Some(external) = &self.external else {
            return;
        };
        let notice = ExternalNotice {
            status,
            title: self.host.hostname(),
            seconds_left: n.and_then(|n| n.seconds_left),
            scheduled_at: n.map(|n| n.scheduled_at),
            reason: n.map(|n| n.reason),
            arm: n.map(|n| n.arm),
        };

        match external.tx.try_send(notice) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(notice)) => {
                warn!(sink = external.sink, status = ?notice.status, arm = ?notice.arm, "external notice dropped: queue full");
            }
            Err(mpsc::error::TrySendError::Closed(notice)) => {
                warn!(sink = external.sink, status = ?notice.status, arm = ?notice.arm, "external notice dropped: worker closed");
            }
        }
    }
}

/// Delivers queued notices one at a time until the notifier is dropped.
async fn delivery_worker(
    sink: Arc<dyn ExternalSink>,
    mut rx: mpsc::Receiver<ExternalNotice>,
    bus: Bus,
) {
    while let Some(notice) = rx.recv().await {
        let fut = sink.deliver(&notice);
        let failure = match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(())) => {
                debug!(sink = sink.name(), status = ?notice.status, "external notice delivered");
                continue;
            }
            Ok(Err(e)) => {
                warn!(
                    sink = sink.name(),
                    status = ?notice.status,
                    label = e.as_label(),
                    "external notice failed: {e}"
                );
                e.to_string()
            }
            Err(panic_err) => {
                error!(sink = sink.name(), status = ?notice.status, "external sink panicked: {panic_err:?}");
                "external sink panicked".to_string()
            }
        };

        let mut ev = Event::new(EventKind::ExternalDeliveryFailed).with_error(failure);
        if let Some(arm) = notice.arm {
            ev = ev.with_arm(arm);
        }
        bus.publish(ev);
    }
}
