//! # Host process primitives.
//!
//! rebootvisor never talks to the server process directly. Everything it needs
//! from the host goes through two narrow traits:
//!
//! - [`Host`]: in-process broadcast, client eviction, shutdown, identity;
//! - [`NativeRestartGuard`]: visibility into a restart routine the host may run on
//!   its own, outside rebootvisor's control.
//!
//! ```text
//! Controller ──► Notifier ──► Host::broadcast()      (init / tick / cancel)
//!      │
//!      └── fire ──► Host::kick_all() ──► Host::shutdown()
//!
//! Scheduler::status()/cancel() ──► NativeRestartGuard::{is_active, cancel}
//! ```

use crate::error::RestartError;

/// Side-effecting primitives owned by the host process.
///
/// Implementations must not block: they are called while the restart state is
/// locked.
pub trait Host: Send + Sync + 'static {
    /// Broadcasts a chat/console message to everybody connected.
    fn broadcast(&self, message: &str, avatar_id: u64);

    /// Disconnects every connected client with the given reason.
    fn kick_all(&self, reason: &str);

    /// Terminates the server process. Expected not to return in production.
    fn shutdown(&self);

    /// Human-readable server identity, used as the external notice title.
    fn hostname(&self) -> String;
}

/// Capability to observe and stop a restart the host started by itself.
///
/// How this is obtained is host-specific (it may require privileged access to
/// host internals); rebootvisor only assumes that cancelling may fail.
pub trait NativeRestartGuard: Send + Sync + 'static {
    /// Returns `true` while the host's own restart routine is running.
    fn is_active(&self) -> bool;

    /// Stops the host's own restart routine.
    ///
    /// Returns [`RestartError::NativeCancelFailed`] when the routine could not be stopped.
    fn cancel(&self) -> Result<(), RestartError>;
}

/// Guard for hosts without a native restart routine.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoNativeRestart;

impl NativeRestartGuard for NoNativeRestart {
    fn is_active(&self) -> bool {
        false
    }

    fn cancel(&self) -> Result<(), RestartError> {
        Ok(())
    }
}
