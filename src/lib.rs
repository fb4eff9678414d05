//! # rebootvisor
//!
//! **Rebootvisor** coordinates scheduled restarts of a long-running server process.
//!
//! It tracks a single pending restart, counts down to it with configurable warning
//! checkpoints, announces every checkpoint in-process and to an external channel,
//! and at zero evicts all clients and shuts the host down. Update signals from the
//! outside world can arm a restart either after a fixed cooldown or at the next
//! daily restart time.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   update signals      operator commands      in-process API
//!         │                    │                     │
//!         ▼                    ▼                     ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scheduler (façade)                                               │
//! │  - Config (live copy, persisted on API changes)                   │
//! │  - plan_update (Cooldown / DailyTime)                             │
//! │  - Command dispatch                                               │
//! │  - NativeRestartGuard (host's own restart takes precedence)       │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Controller (single restart slot, tokio::sync::Mutex)             │
//! │  - RestartState: idle or one arm {id, at, reason, token}          │
//! │  - countdown task per arm: Countdown::next_wake / sleep / on_wake │
//! └──────┬───────────────────────┬───────────────────────┬────────────┘
//!        ▼                       ▼                       ▼
//!   Host::broadcast        ExternalSink::deliver      Bus::publish(Event)
//!   Host::kick_all         (queued, one worker)            │
//!   Host::shutdown                                         ▼
//!                                              subscriber_listener
//!                                                          ▼
//!                                                   SubscriberSet
//!                                                ┌─────────┼─────────┐
//!                                                ▼         ▼         ▼
//!                                            LogWriter   sub2  ...  subN
//! ```
//!
//! ### Countdown
//! ```text
//! arm(at, reason) ──► publish RestartArmed, broadcast "restarting in 1m 5s due to ..."
//!
//! loop {
//!   ├─► next = largest checkpoint ≤ remaining - 1 (0 if none)
//!   ├─► sleep(remaining - next)        (cancellable)
//!   ├─► publish RestartTick{next}, broadcast "restarting in {next}"
//!   ├─► next < 10 ─► external "Now" notice (once per arm)
//!   └─► next == 0 ─► publish RestartFiring, kick_all, shutdown
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Scheduling**    | Arm, cancel and query the pending restart.                   | [`Scheduler`], [`SchedulerBuilder`]         |
//! | **Host**          | Primitives the host process provides.                        | [`Host`], [`NativeRestartGuard`], [`Clock`] |
//! | **Policies**      | Checkpoints, admission and update strategies.                | [`ThresholdTable`], [`Admission`], [`UpdateMethod`] |
//! | **Notifications** | External channel and message templates.                      | [`ExternalSink`], [`Messages`]              |
//! | **Subscriber API**| Hook into restart lifecycle events.                          | [`Subscribe`], [`Event`]                    |
//! | **Errors**        | Typed errors with stable labels.                             | [`RestartError`], [`NotifyError`]           |
//! | **Configuration** | JSON config with default fallback.                           | [`Config`]                                  |
//!
//! ## Optional features
//! - `webhook` (default): Discord webhook sink over `reqwest`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use rebootvisor::{Config, Host, LogWriter, Scheduler, Subscribe};
//!
//! struct Console;
//!
//! impl Host for Console {
//!     fn broadcast(&self, message: &str, _avatar_id: u64) { println!("{message}"); }
//!     fn kick_all(&self, reason: &str) { println!("kick: {reason}"); }
//!     fn shutdown(&self) { println!("shutdown"); }
//!     fn hostname(&self) -> String { "demo".into() }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     let scheduler = Scheduler::builder(Config::default(), Arc::new(Console))
//!         .with_subscribers(subs)
//!         .build();
//!     scheduler.start().await;
//!
//!     println!("{}", scheduler.dispatch(&["restart", "300"]).await);
//!     println!("{}", scheduler.dispatch(&["status"]).await);
//!     println!("{}", scheduler.dispatch(&["cancel"]).await);
//! }
//! ```
mod clock;
mod commands;
mod core;
mod error;
mod events;
mod host;
mod notify;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use clock::{
    Clock, NO_DURATION, SystemClock, TIMESTAMP_FORMAT, format_time, format_timestamp, parse_time,
    seconds_until,
};
pub use commands::Command;
pub use crate::core::{
    ADMIN_RESTART_DELAY_SECS, Cancelled, Config, Countdown, DEFAULT_BUS_CAPACITY, DEFAULT_WEBHOOK,
    FINAL_NOTICE_SECS, HooksConfig, RestartReason, RestartStatus, Scheduler, SchedulerBuilder,
    Wake,
};
pub use error::{CommandError, ConfigError, NotifyError, RestartError};
pub use events::{Bus, Event, EventKind};
pub use host::{Host, NativeRestartGuard, NoNativeRestart};
pub use notify::{ExternalNotice, ExternalSink, Messages, NoticeStatus};
pub use policies::{
    Admission, Component, IgnoreReason, ThresholdTable, UpdateMethod, UpdateOutcome, UpdatePlan,
    UpdateSignal, plan_update,
};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};

#[cfg(feature = "webhook")]
pub use notify::{DiscordWebhook, WebhookMessage};
