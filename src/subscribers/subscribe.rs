//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for reacting to restart events (the typed
//! replacement for global "OnRestartInit/Tick/Now/Cancel" hooks). Each subscriber
//! is driven by a dedicated worker loop fed by a bounded queue owned by the
//! [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching) – they do **not** block the
//!   countdown nor other subscribers.
//! - [`Subscribe::accepts`] narrows the kinds a subscriber is handed; rejected
//!   kinds are never queued for it.
//! - Each subscriber **declares** its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. If a queue overflows, events for that
//!   subscriber are **dropped** (warn).
//!
//! ## Example
//! ```rust
//! use rebootvisor::{Event, EventKind, Subscribe};
//!
//! struct SaveWorldOnFire;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for SaveWorldOnFire {
//!     async fn on_event(&self, _ev: &Event) {
//!         // flush world state...
//!     }
//!     fn accepts(&self, kind: EventKind) -> bool {
//!         kind == EventKind::RestartFiring
//!     }
//!     fn name(&self) -> &'static str { "save-world" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Whether events of `kind` are queued for this subscriber. Defaults to all.
    fn accepts(&self, _kind: EventKind) -> bool {
        true
    }

    /// Preferred capacity of this subscriber's queue.
    ///
    /// On overflow, events for this subscriber are **dropped** (warn).
    fn queue_capacity(&self) -> usize {
        256
    }
}
