//! # Player- and operator-facing message templates.
//!
//! Templates use named placeholders (`{duration}`, `{reason}`, `{status}`,
//! `{time}`) and are filled with plain string replacement, so they can be loaded
//! from any localization source at runtime.

use serde::{Deserialize, Serialize};

/// Message templates with English defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Messages {
    pub help: String,
    pub kick_reason: String,
    pub native_restart_cancel: String,
    pub native_restart_cancel_failed: String,
    pub no_external_sink: String,
    pub no_restart_ongoing: String,
    pub restart_cancel: String,
    pub restart_global: String,
    pub restart_global_short: String,
    pub restart_initialized: String,
    pub status: String,
    pub status_with_time: String,
    pub test_sent: String,
    pub unknown_command: String,
    pub update_source_missing: String,
    pub wrong_number_of_arguments: String,
    pub wrong_time_format: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            help: concat!(
                "\nCommands:\t\t\t\tExplanations:\n\n",
                "- cancel\t\t\t\tCancel the ongoing restart\n",
                "- testNotify\t\t\t\tSend a test message to discord\n",
                "- help\t\t\t\t\tDisplay the help message\n",
                "- restart <time>\t\t\tInitiate a restart (10s if no time given)\n",
                "- status\t\t\t\tDisplay the current restart status",
            )
            .to_string(),
            kick_reason: "The server is restarting for update.".to_string(),
            native_restart_cancel: "Native restart was cancelled.".to_string(),
            native_restart_cancel_failed: "Native restart could not be cancelled: {reason}"
                .to_string(),
            no_external_sink: "No external notification channel is configured.".to_string(),
            no_restart_ongoing: "There is no restart on going!".to_string(),
            restart_cancel: "The restart has been cancelled.".to_string(),
            restart_global: "The server is restarting in {duration} due to {reason}!".to_string(),
            restart_global_short: "The server is restarting in {duration}!".to_string(),
            restart_initialized: "Restart has been initialized.".to_string(),
            status: "Status: {status}".to_string(),
            status_with_time: "Status: {status} - {time}".to_string(),
            test_sent: "Test message sent to discord!".to_string(),
            unknown_command: "Unknown command!".to_string(),
            update_source_missing:
                "No update notice source is connected; update-triggered restarts are disabled."
                    .to_string(),
            wrong_number_of_arguments: "Wrong number of elements! Please check the help command."
                .to_string(),
            wrong_time_format: "Wrong time format! Please use \"hh:mm:ss\" for a planned time OR xxx (in seconds) for a cooldown".to_string(),
        }
    }
}

impl Messages {
    /// Init broadcast.
    pub fn restart_global(&self, duration: &str, reason: &str) -> String {
        self.restart_global
            .replace("{duration}", duration)
            .replace("{reason}", reason)
    }

    /// Tick broadcast.
    pub fn restart_global_short(&self, duration: &str) -> String {
        self.restart_global_short.replace("{duration}", duration)
    }

    /// Status reply without a scheduled time.
    pub fn status(&self, status: &str) -> String {
        self.status.replace("{status}", status)
    }

    /// Status reply with a scheduled time.
    pub fn status_with_time(&self, status: &str, time: &str) -> String {
        self.status_with_time
            .replace("{status}", status)
            .replace("{time}", time)
    }

    pub fn native_restart_cancel_failed(&self, reason: &str) -> String {
        self.native_restart_cancel_failed.replace("{reason}", reason)
    }
}
