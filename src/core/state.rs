//! # Restart state owned by the controller.
//!
//! The state is a single optional [`Armed`] record: `None` means idle. Being armed
//! and having a scheduled time are therefore the same thing by construction.
//!
//! ## Rules
//! - Every arm gets a fresh, monotonically increasing `arm` id and its own
//!   [`CancellationToken`].
//! - `scheduled_at` and `reason` never change for a given arm; re-arming replaces
//!   the whole record.
//! - Only the controller (its public operations and its countdown task) touches the
//!   state, always under the controller's mutex.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Why a restart was armed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestartReason {
    /// Armed by another in-process collaborator through the API.
    ApiCall,
    /// Carbon framework update signal.
    CarbonUpdate,
    /// Oxide framework update signal.
    OxideUpdate,
    /// Server build update signal.
    ServerUpdate,
    /// Recurring daily restart armed at start.
    DailyRestart,
    /// Operator `restart` command.
    AdminRequested,
}

impl RestartReason {
    /// Enum name, as shown to players and in external notices.
    pub fn as_str(&self) -> &'static str {
        match self {
            RestartReason::ApiCall => "ApiCall",
            RestartReason::CarbonUpdate => "CarbonUpdate",
            RestartReason::OxideUpdate => "OxideUpdate",
            RestartReason::ServerUpdate => "ServerUpdate",
            RestartReason::DailyRestart => "DailyRestart",
            RestartReason::AdminRequested => "AdminRequested",
        }
    }
}

impl fmt::Display for RestartReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer of a status query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestartStatus {
    /// The host's own restart routine is running (takes precedence).
    NativeRestartInProgress,
    /// A countdown is running towards `at`.
    RestartScheduled {
        /// Absolute restart time.
        at: DateTime<Utc>,
    },
    /// Nothing planned.
    NoRestartPlanned,
}

impl RestartStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            RestartStatus::NativeRestartInProgress => "Restarting (Native)",
            RestartStatus::RestartScheduled { .. } => "Restarting",
            RestartStatus::NoRestartPlanned => "No planned restart",
        }
    }

    /// Scheduled time, present only for [`RestartStatus::RestartScheduled`].
    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        match self {
            RestartStatus::RestartScheduled { at } => Some(*at),
            _ => None,
        }
    }
}

/// One live arm.
pub(crate) struct Armed {
    /// Arm generation.
    pub arm: u64,
    /// Absolute target.
    pub scheduled_at: DateTime<Utc>,
    pub reason: RestartReason,
    /// Final notice already handed to the external sink for this arm.
    pub last_notification_sent: bool,
    /// Cancels the countdown task's pending wait.
    pub token: CancellationToken,
}

/// Controller state: idle or exactly one arm.
#[derive(Default)]
pub(crate) struct RestartState {
    next_arm: u64,
    pub current: Option<Armed>,
}

impl RestartState {
    /// Installs a new arm and returns its id and token.
    ///
    /// The caller must have cancelled the previous arm first.
    pub fn arm(
        &mut self,
        scheduled_at: DateTime<Utc>,
        reason: RestartReason,
    ) -> (u64, CancellationToken) {
        self.next_arm += 1;
        let token = CancellationToken::new();
        self.current = Some(Armed {
            arm: self.next_arm,
            scheduled_at,
            reason,
            last_notification_sent: false,
            token: token.clone(),
        });
        (self.next_arm, token)
    }

    /// Returns the arm if it is still the live one and was not cancelled.
    pub fn live(&mut self, arm: u64) -> Option<&mut Armed> {
        self.current
            .as_mut()
            .filter(|a| a.arm == arm && !a.token.is_cancelled())
    }

    /// Removes the current arm (if any), cancelling its countdown wait.
    pub fn clear(&mut self) -> Option<Armed> {
        let armed = self.current.take()?;
        armed.token.cancel();
        Some(armed)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}
