//! # Update-triggered restart policy.
//!
//! Translates an external "component updated" signal into an arm request.
//!
//! ```text
//! UpdateSignal{component, version}
//!   ├─ enableUpdateNotice == false        ─► Ignored(NoticeDisabled)
//!   ├─ hooks.enableOn<Component> == false  ─► Ignored(ComponentDisabled)
//!   └─ hooks.method
//!        ├─ Cooldown  ─► Arm{ now + cooldownSeconds, Replace }
//!        └─ DailyTime
//!             ├─ enableDailyRestart == false ─► Ignored(DailyRestartDisabled)
//!             ├─ dailyRestartTime invalid    ─► Ignored(InvalidTime)
//!             └─ Arm{ next daily time, DropIfRunning }
//! ```
//!
//! The "already armed" check of the daily-time strategy is enforced by the
//! controller through [`Admission::DropIfRunning`], under its lock.

use std::fmt;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    clock::parse_time,
    core::{Config, RestartReason},
    error::RestartError,
    policies::Admission,
};

/// Strategy selected by `hooks.method`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpdateMethod {
    /// Restart a fixed number of seconds after the signal.
    #[default]
    #[serde(alias = "COOLDOWN")]
    Cooldown,
    /// Restart at the configured daily time.
    #[serde(alias = "DAILY_TIME")]
    DailyTime,
}

/// Component whose update may trigger a restart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Carbon,
    Oxide,
    Server,
}

impl Component {
    /// Restart reason recorded for this component.
    pub fn reason(&self) -> RestartReason {
        match self {
            Component::Carbon => RestartReason::CarbonUpdate,
            Component::Oxide => RestartReason::OxideUpdate,
            Component::Server => RestartReason::ServerUpdate,
        }
    }

    fn enabled_in(&self, cfg: &Config) -> bool {
        match self {
            Component::Carbon => cfg.hooks.enable_on_carbon_update,
            Component::Oxide => cfg.hooks.enable_on_oxide_update,
            Component::Server => cfg.hooks.enable_on_server_update,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Component::Carbon => "Carbon",
            Component::Oxide => "Oxide",
            Component::Server => "Server",
        })
    }
}

/// "Component updated" signal. The version is opaque and only logged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateSignal {
    pub component: Component,
    pub version: String,
}

impl UpdateSignal {
    pub fn new(component: Component, version: impl Into<String>) -> Self {
        Self {
            component,
            version: version.into(),
        }
    }
}

/// Why a signal did not arm anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// `enableUpdateNotice` is off.
    NoticeDisabled,
    /// The component's `hooks.enableOn*` toggle is off.
    ComponentDisabled,
    /// Daily-time strategy while `enableDailyRestart` is off.
    DailyRestartDisabled,
    /// Daily-time strategy while a restart is already pending.
    AlreadyActive,
    /// `dailyRestartTime` could not be parsed.
    InvalidTime(RestartError),
}

/// What the policy wants the controller to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdatePlan {
    Arm {
        at: DateTime<Utc>,
        reason: RestartReason,
        admission: Admission,
    },
    Ignore(IgnoreReason),
}

/// Final result of handling a signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Armed { at: DateTime<Utc> },
    Ignored(IgnoreReason),
}

/// Decides how to react to `component` being updated, given the live config.
pub fn plan_update(cfg: &Config, component: Component, now: DateTime<Utc>) -> UpdatePlan {
    if !cfg.enable_update_notice {
        return UpdatePlan::Ignore(IgnoreReason::NoticeDisabled);
    }
    if !component.enabled_in(cfg) {
        return UpdatePlan::Ignore(IgnoreReason::ComponentDisabled);
    }

    let reason = component.reason();
    match cfg.hooks.method {
        UpdateMethod::Cooldown => {
            let secs = i64::try_from(cfg.hooks.cooldown_seconds).unwrap_or(i64::MAX);
            let at = ChronoDuration::try_seconds(secs)
                .and_then(|d| now.checked_add_signed(d))
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            UpdatePlan::Arm {
                at,
                reason,
                admission: Admission::Replace,
            }
        }
        UpdateMethod::DailyTime => {
            if !cfg.enable_daily_restart {
                return UpdatePlan::Ignore(IgnoreReason::DailyRestartDisabled);
            }
            match parse_time(&cfg.daily_restart_time, now) {
                Ok(at) => UpdatePlan::Arm {
                    at,
                    reason,
                    admission: Admission::DropIfRunning,
                },
                Err(e) => UpdatePlan::Ignore(IgnoreReason::InvalidTime(e)),
            }
        }
    }
}
