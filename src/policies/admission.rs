//! # Arm admission policy
//!
//! The controller has a single restart slot. When an arm request arrives while a
//! countdown is already running, the admission policy decides what happens.
//!
//! ## Variants
//! - `Replace`: **cancel** the running countdown (its Cancelled notice still goes
//!   out) and arm the new one.
//! - `DropIfRunning`: if a countdown is running, **ignore** the new request.
//!
//! ## Invariants
//! - Two countdowns never run at the same time.
//! - With `Replace`, the old arm's Cancelled notice always precedes the new arm's
//!   Init notice.

/// Policy controlling how an arm request is handled when a restart is pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Admission {
    /// Stop the current countdown and start the new one.
    ///
    /// Use when the newest request wins:
    /// - operator `restart` commands
    /// - API calls
    /// - cooldown-driven update restarts
    #[default]
    Replace,

    /// Keep the current countdown, drop the request.
    ///
    /// Use when the request only supplements an existing schedule:
    /// - daily-time update restarts
    DropIfRunning,
}
