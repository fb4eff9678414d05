//! Runtime core: restart state, countdown and orchestration.
//!
//! The public entry point is [`Scheduler`] (built with [`SchedulerBuilder`]).
//!
//! Internal modules:
//! - [`config`]: persisted settings with default fallback;
//! - [`state`]: the single restart slot (idle or one arm);
//! - [`countdown`]: pure checkpoint state machine;
//! - [`controller`]: drives the countdown on tokio with cancellation;
//! - [`scheduler`]: façade over controller, config, commands and update signals;
//! - [`builder`]: wiring of bus, subscribers, notifier and controller.

mod builder;
mod config;
mod controller;
mod countdown;
mod scheduler;
mod state;

pub use builder::{DEFAULT_BUS_CAPACITY, SchedulerBuilder};
pub use config::{Config, DEFAULT_WEBHOOK, HooksConfig};
pub(crate) use controller::{Controller, ControllerConfig};
pub use controller::FINAL_NOTICE_SECS;
pub use countdown::{Countdown, Wake};
pub use scheduler::{ADMIN_RESTART_DELAY_SECS, Cancelled, Scheduler};
pub use state::{RestartReason, RestartStatus};
