//! Restart scheduling policies.
//!
//! This module groups the knobs that control **when** announcements fire,
//! **whether** a new arm request may replace a pending one, and **how** update
//! signals turn into arm requests.
//!
//! ## Contents
//! - [`ThresholdTable`] announcement checkpoints (seconds before restart)
//! - [`Admission`]      replace vs. drop-if-running for arm requests
//! - [`UpdateMethod`], [`plan_update`] update-signal strategies (cooldown / daily time)
//!
//! ## Quick wiring
//! ```text
//! Config { restartMessageCooldown, hooks.method, ... }
//!      ├─► ThresholdTable ─► Countdown::next_wake()
//!      └─► plan_update()  ─► Controller::submit(at, reason, Admission)
//! ```

mod admission;
mod thresholds;
mod update;

pub use admission::Admission;
pub use thresholds::ThresholdTable;
pub use update::{
    Component, IgnoreReason, UpdateMethod, UpdateOutcome, UpdatePlan, UpdateSignal, plan_update,
};
