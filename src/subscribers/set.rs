//! # SubscriberSet: restart-event fan-out
//!
//! [`SubscriberSet`] hands each restart [`Event`] to every subscriber that
//! [accepts](Subscribe::accepts) its kind, **without awaiting** their processing.
//!
//! ## Rules
//! - `emit(&Event)` returns immediately; the countdown never waits on a subscriber.
//! - Per-subscriber FIFO: a subscriber sees an arm's `RestartArmed` before its
//!   ticks and its `RestartFiring` / `RestartCancelled`.
//! - A subscriber that does not accept a kind never has it queued, so chatty
//!   `RestartTick` events cannot crowd out the kinds it cares about.
//! - Panics inside subscribers are caught and logged with the arm they were
//!   handling; the worker keeps going with the next event.
//! - Queue overflow drops the event for that subscriber only (warn, no retry).
//! - [`SubscriberSet::shutdown`] closes the queues and waits until every worker has
//!   handled what was already queued. The scheduler calls it on unload, so the
//!   final `RestartCancelled` reaches subscribers before `unload()` returns.
//!
//! ## Diagram
//! ```text
//!    emit(&Event)
//!        │        accepts(kind)?
//!        ├──────────────┬─────► [queue S1] ─► worker S1 ─► on_event()
//!        ├──────────────┼─────► [queue S2] ─► worker S2 ─► on_event()
//!        └──────────────┴─────► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{error, trace, warn};

use crate::events::Event;

use super::Subscribe;

/// Queue into one subscriber's worker.
struct SubscriberChannel {
    sub: Arc<dyn Subscribe>,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out with per-subscriber kind filter, bounded queue and worker task.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let (tx, rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
            workers.push(tokio::spawn(worker(Arc::clone(&sub), rx)));
            channels.push(SubscriberChannel { sub, sender: tx });
        }

        Self { channels, workers }
    }

    /// Queues one event for every subscriber that accepts its kind (non-blocking).
    ///
    /// If a subscriber's queue is **full** or **closed**, the event is dropped for it
    /// and a warning is logged with the subscriber's name and the arm.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for channel in &self.channels {
            if !channel.sub.accepts(ev.kind) {
                continue;
            }
            let reason = match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "queue full",
                Err(mpsc::error::TrySendError::Closed(_)) => "worker closed",
            };
            warn!(
                subscriber = channel.sub.name(),
                kind = ?ev.kind,
                arm = ?ev.arm,
                seq = ev.seq,
                "dropped event: {reason}"
            );
        }
    }

    /// Closes all queues and waits until the workers have drained them.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

async fn worker(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>) {
    while let Some(ev) = rx.recv().await {
        let fut = sub.on_event(ev.as_ref());
        if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            error!(
                subscriber = sub.name(),
                kind = ?ev.kind,
                arm = ?ev.arm,
                "subscriber panicked: {panic_err:?}"
            );
        }
    }
    trace!(subscriber = sub.name(), "subscriber queue drained");
}
