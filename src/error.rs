//! Error types used by the rebootvisor runtime.
//!
//! This module defines four error enums:
//!
//! - [`RestartError`]: errors returned synchronously to whoever asked for a restart
//!   operation (command handler, update policy, programmatic API).
//! - [`NotifyError`]: failures of the external notification sink. These never leave
//!   the notifier: they are logged and published on the bus, nothing more.
//! - [`ConfigError`]: failures while reading or writing the persisted configuration.
//! - [`CommandError`]: operator input that does not name a known command.
//!
//! All of them provide `as_label` (stable snake_case label for logs/metrics).

use thiserror::Error;

/// # Errors produced by restart operations.
///
/// Returned to the immediate caller for user-facing reporting. None of them
/// changes the restart state.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RestartError {
    /// Time-of-day or cooldown string could not be parsed.
    #[error("wrong time format {input:?}: expected \"hh:mm:ss\" or a number of seconds")]
    InvalidTimeFormat {
        /// The rejected input.
        input: String,
    },

    /// Cancel requested while nothing is armed.
    #[error("no restart is ongoing")]
    NoActiveRestart,

    /// The host refused or failed to stop its own restart routine.
    #[error("failed to cancel native restart: {reason}")]
    NativeCancelFailed {
        /// Host-specific failure description.
        reason: String,
    },
}

impl RestartError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use rebootvisor::RestartError;
    ///
    /// let err = RestartError::NoActiveRestart;
    /// assert_eq!(err.as_label(), "restart_not_active");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RestartError::InvalidTimeFormat { .. } => "restart_invalid_time",
            RestartError::NoActiveRestart => "restart_not_active",
            RestartError::NativeCancelFailed { .. } => "restart_native_cancel_failed",
        }
    }

    /// Shorthand for building [`RestartError::InvalidTimeFormat`].
    pub(crate) fn invalid_time(input: &str) -> Self {
        RestartError::InvalidTimeFormat {
            input: input.to_string(),
        }
    }
}

/// # Errors produced by the external notification sink.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The underlying HTTP request failed (network, DNS, no response, ...).
    #[cfg(feature = "webhook")]
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote endpoint answered with a non-success status.
    #[error("webhook returned HTTP {0}")]
    HttpStatus(u16),

    /// Failure reported by a custom sink implementation.
    #[error("delivery failed: {error}")]
    Sink {
        /// The underlying error message.
        error: String,
    },
}

impl NotifyError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            #[cfg(feature = "webhook")]
            NotifyError::Request(_) => "notify_request",
            NotifyError::HttpStatus(_) => "notify_http_status",
            NotifyError::Sink { .. } => "notify_sink",
        }
    }
}

/// # Errors produced while loading or saving the configuration file.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON for [`Config`](crate::Config).
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::Io(_) => "config_io",
            ConfigError::Json(_) => "config_json",
        }
    }
}

/// # Errors produced while parsing an operator command line.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Empty input or an unrecognized command word.
    #[error("unknown command {name:?}")]
    UnknownCommand {
        /// The rejected command word (empty if none was given).
        name: String,
    },

    /// The command exists but got too many arguments.
    #[error("wrong number of arguments for {command}: got {got}")]
    WrongNumberOfArguments {
        /// The command word.
        command: &'static str,
        /// Number of arguments after the command word.
        got: usize,
    },
}

impl CommandError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CommandError::UnknownCommand { .. } => "command_unknown",
            CommandError::WrongNumberOfArguments { .. } => "command_wrong_arity",
        }
    }
}
