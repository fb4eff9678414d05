//! # External notification sink.
//!
//! An [`ExternalSink`] receives sink-agnostic [`ExternalNotice`]s and turns them
//! into whatever its transport needs (for example a Discord webhook message).
//!
//! ## Contract
//! - Delivery is best-effort: the notifier spawns `deliver` and never awaits it on
//!   the countdown path.
//! - Failures are returned, then logged and published by the notifier. Sinks do not
//!   retry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{core::RestartReason, error::NotifyError};

/// Kind of external notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeStatus {
    /// Pending restart was cancelled.
    Canceled,
    /// A restart was armed.
    Initialized,
    /// Final notice, the restart is imminent.
    Now,
    /// Operator test message.
    Test,
}

impl NoticeStatus {
    /// Description line for this status.
    pub fn description(&self, duration: &str) -> String {
        match self {
            NoticeStatus::Canceled => "The server restart has been canceled!".to_string(),
            NoticeStatus::Initialized => format!("The server will restart in {duration}!"),
            NoticeStatus::Now => "The server is restarting!".to_string(),
            NoticeStatus::Test => "This is a test message!".to_string(),
        }
    }

    /// Embed color for this status (decimal RGB).
    pub fn color(&self) -> u32 {
        match self {
            NoticeStatus::Canceled => 10_181_046,
            NoticeStatus::Initialized => 15_105_570,
            NoticeStatus::Now => 16_711_686,
            NoticeStatus::Test => 1_752_220,
        }
    }
}

/// Everything an external sink may render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalNotice {
    pub status: NoticeStatus,
    /// Host identity, used as title.
    pub title: String,
    /// Seconds left (Init only).
    pub seconds_left: Option<u64>,
    /// Absolute restart time, if a restart is pending.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Restart reason, if a restart is pending.
    pub reason: Option<RestartReason>,
    /// Arm generation the notice belongs to.
    pub arm: Option<u64>,
}

/// Outbound notification channel independent of in-process broadcast.
#[async_trait]
pub trait ExternalSink: Send + Sync + 'static {
    /// Delivers one notice. Called from a spawned task.
    async fn deliver(&self, notice: &ExternalNotice) -> Result<(), NotifyError>;

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
