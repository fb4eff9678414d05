//! # Event subscribers for the rebootvisor runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out and
//! the built-in [`LogWriter`], all fed from the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Notifier ── publish(Event) ──► Bus ──► subscriber_listener ──► SubscriberSet::emit
//!                                                                       │
//!                                                           ┌───────────┼───────────┐
//!                                                           ▼           ▼           ▼
//!                                                       LogWriter    Custom        ...
//! ```

mod log;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
