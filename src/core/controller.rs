//! # Controller: the single restart slot.
//!
//! The [`Controller`] owns the restart state and drives one countdown task per arm.
//!
//! ## State machine
//! ```text
//!            submit(at, reason)                 wake (checkpoint > 0)
//!   Idle ─────────────────────────► Armed ◄──────────────────────┐
//!    ▲                               │ │ └───────────────────────┘  Tick
//!    │            cancel()           │ │
//!    ├───────────────────────────────┘ │ wake (checkpoint == 0)
//!    │  Cancelled                      ▼
//!    └──────────────────────────── Firing ──► kick_all ──► shutdown
//! ```
//!
//! ## Countdown task
//! ```text
//! loop {
//!   ├─► wake = countdown.next_wake()       (None → fire)
//!   ├─► select! { sleep(wake.delay), token.cancelled() → exit }
//!   ├─► lock state; exit unless this arm is still live
//!   ├─► publish Tick(checkpoint), broadcast
//!   └─► checkpoint < 10 && external on && not yet sent → external Now (once per arm)
//! }
//! ```
//!
//! ## Rules
//! - Every operation and every wake takes the same mutex, so an arm's notices are
//!   strictly ordered and a replaced arm's Cancelled precedes the new Init.
//! - Cancellation cancels the arm's token (interrupting the sleep) and the task
//!   re-checks the arm under the lock before acting: nothing of a cancelled arm is
//!   observed after `cancel()` returns.
//! - The lock is held from eviction through the shutdown call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::{select, sync::Mutex, time};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    clock::{Clock, seconds_until},
    core::{
        countdown::Countdown,
        state::{RestartReason, RestartState, RestartStatus},
    },
    error::RestartError,
    host::{Host, NativeRestartGuard},
    notify::{Notice, Notifier},
    policies::{Admission, ThresholdTable},
};

/// Below this many seconds left, the external sink gets its final notice.
pub const FINAL_NOTICE_SECS: u64 = 10;

/// Static controller settings.
#[derive(Clone, Debug)]
pub(crate) struct ControllerConfig {
    /// Announcement checkpoints.
    pub thresholds: ThresholdTable,
    /// Reason given to evicted clients at fire time.
    pub kick_message: String,
}

/// Owns the pending restart and its countdown task.
pub(crate) struct Controller {
    cfg: ControllerConfig,
    state: Mutex<RestartState>,
    notifier: Notifier,
    host: Arc<dyn Host>,
    native: Arc<dyn NativeRestartGuard>,
    clock: Arc<dyn Clock>,
}

impl Controller {
    /// Creates an idle controller.
    pub(crate) fn new(
        cfg: ControllerConfig,
        notifier: Notifier,
        host: Arc<dyn Host>,
        native: Arc<dyn NativeRestartGuard>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        Arc::new(Self {
            cfg,
            state: Mutex::new(RestartState::default()),
            notifier,
            host,
            native,
            clock,
        })
    }

    /// Arms a restart at `at`, replacing any pending one.
    pub async fn arm(self: &Arc<Self>, at: DateTime<Utc>, reason: RestartReason) {
        self.submit(at, reason, Admission::Replace).await;
    }

    /// Arms a restart at `at` under the given admission policy.
    ///
    /// Returns `false` when the request was dropped (`DropIfRunning` while armed).
    /// A target in the past fires immediately.
    pub async fn submit(
        self: &Arc<Self>,
        at: DateTime<Utc>,
        reason: RestartReason,
        admission: Admission,
    ) -> bool {
        let mut state = self.state.lock().await;

        if state.is_active() {
            match admission {
                Admission::DropIfRunning => {
                    debug!(%reason, "restart already pending, request dropped");
                    return false;
                }
                Admission::Replace => self.cancel_locked(&mut state),
            }
        }

        let seconds_left = seconds_until(self.clock.now(), at);
        let (arm, token) = state.arm(at, reason);
        info!(arm, %reason, seconds_left, "restart armed");

        self.notifier.init(&Notice {
            arm,
            reason,
            scheduled_at: at,
            seconds_left: Some(seconds_left),
        });

        let countdown = Countdown::new(seconds_left, self.cfg.thresholds.clone());
        let this = Arc::clone(self);
        tokio::spawn(async move { this.run_countdown(arm, countdown, token).await });
        true
    }

    /// Cancels the pending restart.
    ///
    /// Returns [`RestartError::NoActiveRestart`] (and changes nothing) when idle.
    pub async fn cancel(&self) -> Result<(), RestartError> {
        let mut state = self.state.lock().await;
        if !state.is_active() {
            return Err(RestartError::NoActiveRestart);
        }
        self.cancel_locked(&mut state);
        Ok(())
    }

    /// Current status; a running native restart takes precedence.
    pub async fn status(&self) -> RestartStatus {
        if self.native.is_active() {
            return RestartStatus::NativeRestartInProgress;
        }
        match self.next_scheduled().await {
            Some(at) => RestartStatus::RestartScheduled { at },
            None => RestartStatus::NoRestartPlanned,
        }
    }

    /// Scheduled time of the pending restart.
    pub async fn next_scheduled(&self) -> Option<DateTime<Utc>> {
        self.state
            .lock()
            .await
            .current
            .as_ref()
            .map(|a| a.scheduled_at)
    }

    /// Reason of the pending restart.
    pub async fn reason(&self) -> Option<RestartReason> {
        self.state.lock().await.current.as_ref().map(|a| a.reason)
    }

    /// True while a countdown is running.
    pub async fn is_active(&self) -> bool {
        self.state.lock().await.is_active()
    }

    /// The host's native restart guard.
    pub fn native(&self) -> &Arc<dyn NativeRestartGuard> {
        &self.native
    }

    /// Sends the operator test notice with the pending restart's details, if any.
    pub(crate) async fn send_test_notice(&self) -> bool {
        let state = self.state.lock().await;
        let pending = state.current.as_ref().map(|a| Notice {
            arm: a.arm,
            reason: a.reason,
            scheduled_at: a.scheduled_at,
            seconds_left: None,
        });
        self.notifier.test(pending.as_ref())
    }

    /// Emits Cancelled for the current arm and clears it. Caller holds the lock.
    fn cancel_locked(&self, state: &mut RestartState) {
        let Some(armed) = state.current.as_ref() else {
            return;
        };
        let notice = Notice {
            arm: armed.arm,
            reason: armed.reason,
            scheduled_at: armed.scheduled_at,
            seconds_left: None,
        };
        info!(arm = notice.arm, reason = %notice.reason, "restart cancelled");
        self.notifier.cancelled(&notice);
        state.clear();
    }

    async fn run_countdown(
        self: Arc<Self>,
        arm: u64,
        mut countdown: Countdown,
        token: CancellationToken,
    ) {
        while let Some(wake) = countdown.next_wake() {
            debug!(arm, delay = ?wake.delay, checkpoint = wake.checkpoint, "waiting for next checkpoint");

            let sleep = time::sleep(wake.delay);
            tokio::pin!(sleep);
            select! {
                _ = &mut sleep => {}
                _ = token.cancelled() => { return; }
            }

            let mut state = self.state.lock().await;
            let Some(armed) = state.live(arm) else {
                return;
            };

            let checkpoint = countdown.on_wake(wake);
            let final_notice = checkpoint < FINAL_NOTICE_SECS
                && !armed.last_notification_sent
                && self.notifier.external_enabled();
            if final_notice {
                armed.last_notification_sent = true;
            }

            self.notifier.tick(
                &Notice {
                    arm,
                    reason: armed.reason,
                    scheduled_at: armed.scheduled_at,
                    seconds_left: Some(checkpoint),
                },
                final_notice,
            );
        }

        self.fire(arm).await;
    }

    async fn fire(&self, arm: u64) {
        let mut state = self.state.lock().await;
        let Some(armed) = state.live(arm) else {
            return;
        };
        let notice = Notice {
            arm,
            reason: armed.reason,
            scheduled_at: armed.scheduled_at,
            seconds_left: None,
        };

        info!(arm, reason = %notice.reason, "restart firing");
        self.notifier.firing(&notice);
        self.host.kick_all(&self.cfg.kick_message);
        state.clear();
        self.host.shutdown();
    }
}
