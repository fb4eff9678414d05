//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the controller, its countdown
//! task, the notifier and the scheduler.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Notifier` (armed/tick/cancelled/firing, delivery failures),
//!   `Scheduler` (native restart cancelled).
//! - **Consumers**: `Scheduler::subscriber_listener()` (fans out to `SubscriberSet`),
//!   plus any receiver obtained through [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
