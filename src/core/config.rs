//! # Scheduler configuration.
//!
//! Provides [`Config`], the persisted settings of the restart scheduler, stored as
//! camelCase JSON.
//!
//! Config is used in three ways:
//! 1. **Scheduler creation**: `Scheduler::builder(config)`
//! 2. **Controller defaults**: threshold table and external notification toggle
//! 3. **Runtime decisions**: update policy and daily restart read the live copy
//!    held by the scheduler (the API can change the daily fields at runtime)
//!
//! ## Loading
//! [`Config::load_or_default`] never fails: a missing or malformed file is logged,
//! replaced by [`Config::default`], and the fallback is written back.
//!
//! ## Example file
//! ```json
//! {
//!   "chatAvatarId": 0,
//!   "enableUpdateNotice": true,
//!   "hooks": {
//!     "method": "Cooldown",
//!     "cooldownSeconds": 300,
//!     "enableOnCarbonUpdate": false,
//!     "enableOnOxideUpdate": true,
//!     "enableOnServerUpdate": true
//!   },
//!   "restartMessageCooldown": [3600, 1800, 900, 300, 120, 60, 30, 10, 5, 4, 3, 2, 1],
//!   "enableDailyRestart": false,
//!   "dailyRestartTime": "04:00:00",
//!   "enableDiscordNotification": false,
//!   "discordWebhook": "https://discord.com/api/webhooks/...",
//!   "discordRoleId": 0
//! }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{
    error::ConfigError,
    policies::{ThresholdTable, UpdateMethod},
};

/// Placeholder webhook URL written into fresh configs.
pub const DEFAULT_WEBHOOK: &str =
    "https://support.discordapp.com/hc/en-us/articles/228383668-Intro-to-Webhooks";

/// Update-triggered restart settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HooksConfig {
    /// Strategy used when an update signal arrives.
    pub method: UpdateMethod,
    /// Delay before restart for [`UpdateMethod::Cooldown`].
    pub cooldown_seconds: u64,
    /// React to Carbon update signals.
    pub enable_on_carbon_update: bool,
    /// React to Oxide update signals.
    pub enable_on_oxide_update: bool,
    /// React to server build update signals.
    pub enable_on_server_update: bool,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            method: UpdateMethod::Cooldown,
            cooldown_seconds: 300,
            enable_on_carbon_update: false,
            enable_on_oxide_update: true,
            enable_on_server_update: true,
        }
    }
}

/// Persisted scheduler settings.
///
/// ## Field semantics
/// - `chat_avatar_id`: identity used for in-process broadcasts (`0` = host default)
/// - `enable_update_notice`: gates update signals entirely
/// - `restart_message_cooldown`: the announcement [`ThresholdTable`]
/// - `daily_restart_time`: `HH:MM:SS` (UTC) or a number of seconds
/// - `discord_role_id`: role mentioned in external notices (`0` = no mention)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub chat_avatar_id: u64,
    pub enable_update_notice: bool,
    pub hooks: HooksConfig,
    pub restart_message_cooldown: Vec<u64>,
    pub enable_daily_restart: bool,
    pub daily_restart_time: String,
    pub enable_discord_notification: bool,
    pub discord_webhook: String,
    pub discord_role_id: u64,
}

impl Config {
    /// Returns the announcement checkpoints as a normalized table.
    #[inline]
    pub fn thresholds(&self) -> ThresholdTable {
        ThresholdTable::new(self.restart_message_cooldown.iter().copied())
    }

    /// Returns the role to mention in external notices, if any.
    #[inline]
    pub fn mention_role(&self) -> Option<u64> {
        if self.discord_role_id == 0 {
            None
        } else {
            Some(self.discord_role_id)
        }
    }

    /// Reads a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Reads a config file, falling back to (and persisting) defaults on failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let cfg = match Self::load(path) {
            Ok(cfg) => cfg,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, writing defaults");
                Self::default()
            }
            Err(e) => {
                error!(path = %path.display(), label = e.as_label(), "{e}");
                warn!(path = %path.display(), "configuration has been reset");
                Self::default()
            }
        };
        if let Err(e) = cfg.save(path) {
            warn!(path = %path.display(), "failed to persist config: {e}");
        }
        cfg
    }

    /// Writes the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - update notices on, cooldown strategy, 300s
    /// - thresholds `3600,1800,900,300,120,60,30,10,5,4,3,2,1`
    /// - daily restart off, at `04:00:00`
    /// - external notifications off
    fn default() -> Self {
        Self {
            chat_avatar_id: 0,
            enable_update_notice: true,
            hooks: HooksConfig::default(),
            restart_message_cooldown: vec![3600, 1800, 900, 300, 120, 60, 30, 10, 5, 4, 3, 2, 1],
            enable_daily_restart: false,
            daily_restart_time: "04:00:00".to_string(),
            enable_discord_notification: false,
            discord_webhook: DEFAULT_WEBHOOK.to_string(),
            discord_role_id: 0,
        }
    }
}
