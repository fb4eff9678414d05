//! # Scheduler: the public face of rebootvisor.
//!
//! The [`Scheduler`] owns the restart controller, the live [`Config`] and the event
//! [`Bus`]; its listener task owns the [`SubscriberSet`]. Everything a host or another in-process
//! collaborator can do goes through it:
//!
//! ```text
//! host lifecycle ──► start() / unload()
//! update signals ──► on_update(signal) ──► plan_update(cfg) ──► Controller::submit
//! operator input ──► dispatch(args) ──► Command::parse ──► execute(command) ──► reply
//! programmatic   ──► arm_at / enable_recurring_daily / set_daily_time / status / ...
//!
//! Event flow:
//!   Notifier / Scheduler ── publish(Event) ──► Bus ──► subscriber_listener ──► SubscriberSet::emit
//! ```
//!
//! ## Rules
//! - A native restart run by the host takes precedence for `status()` and `cancel()`.
//! - Config mutations made through the API are persisted to the configured path
//!   (if any); persistence failures are logged and otherwise ignored.
//! - `unload()` cancels a running native restart and the pending restart, then
//!   stops the subscriber listener. Events published up to that point, including
//!   the final `RestartCancelled`, are handled by subscribers before it returns.

use std::{path::PathBuf, sync::Arc};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::{
    select,
    sync::{
        Mutex, RwLock,
        broadcast::error::{RecvError, TryRecvError},
    },
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    clock::{Clock, format_timestamp, parse_time},
    commands::Command,
    core::{
        builder::SchedulerBuilder,
        config::Config,
        controller::Controller,
        state::{RestartReason, RestartStatus},
    },
    error::{CommandError, RestartError},
    events::{Bus, Event, EventKind},
    host::Host,
    notify::Messages,
    policies::{IgnoreReason, UpdateOutcome, UpdatePlan, UpdateSignal, plan_update},
    subscribers::SubscriberSet,
};

/// Delay used by `restart` without an argument.
pub const ADMIN_RESTART_DELAY_SECS: i64 = 10;

/// What [`Scheduler::cancel`] stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cancelled {
    /// The host's own restart routine.
    Native,
    /// The restart pending in the controller.
    Scheduled,
}

/// Restart scheduler handle. Build it with [`Scheduler::builder`] and share it via `Arc`.
pub struct Scheduler {
    controller: Arc<Controller>,
    config: RwLock<Config>,
    config_path: Option<PathBuf>,
    clock: Arc<dyn Clock>,
    bus: Bus,
    messages: Arc<Messages>,
    listener_token: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    /// Starts building a scheduler around `config` for the given host.
    pub fn builder(config: Config, host: Arc<dyn Host>) -> SchedulerBuilder {
        SchedulerBuilder::new(config, host)
    }

    pub(crate) fn new_internal(
        controller: Arc<Controller>,
        config: Config,
        config_path: Option<PathBuf>,
        clock: Arc<dyn Clock>,
        bus: Bus,
        messages: Arc<Messages>,
        listener_token: CancellationToken,
        listener: JoinHandle<()>,
    ) -> Self {
        Self {
            controller,
            config: RwLock::new(config),
            config_path,
            clock,
            bus,
            messages,
            listener_token,
            listener: Mutex::new(Some(listener)),
        }
    }

    /// Arms the recurring daily restart if it is enabled.
    ///
    /// An unparsable `dailyRestartTime` is logged and skipped.
    pub async fn start(&self) {
        let (enabled, daily) = {
            let cfg = self.config.read().await;
            (cfg.enable_daily_restart, cfg.daily_restart_time.clone())
        };
        if !enabled {
            debug!("daily restart disabled");
            return;
        }
        match parse_time(&daily, self.clock.now()) {
            Ok(at) => self.controller.arm(at, RestartReason::DailyRestart).await,
            Err(e) => warn!(label = e.as_label(), "daily restart skipped: {e}"),
        }
    }

    /// Cancels a running native restart and the pending restart, then stops
    /// forwarding events to subscribers once they have handled the backlog.
    ///
    /// Calling it again is harmless.
    pub async fn unload(&self) {
        let native = self.controller.native();
        if native.is_active() {
            match native.cancel() {
                Ok(()) => self.native_cancelled(),
                Err(e) => warn!(label = e.as_label(), "{e}"),
            }
        }
        if self.controller.cancel().await.is_ok() {
            info!("pending restart cancelled on unload");
        }
        self.listener_token.cancel();
        let Some(listener) = self.listener.lock().await.take() else {
            return;
        };
        if let Err(e) = listener.await {
            warn!("subscriber listener failed: {e}");
        }
    }

    // ---------------------------------------------------------------------
    // Programmatic API
    // ---------------------------------------------------------------------

    /// Arms a restart at `at` on behalf of another in-process collaborator.
    pub async fn arm_at(&self, at: DateTime<Utc>) {
        self.controller.arm(at, RestartReason::ApiCall).await;
    }

    /// Turns the recurring daily restart on or off and persists the change.
    ///
    /// Takes effect on the next `start()`; a pending restart is left untouched.
    pub async fn enable_recurring_daily(&self, enabled: bool) {
        let mut cfg = self.config.write().await;
        cfg.enable_daily_restart = enabled;
        self.persist(&cfg);
    }

    /// Sets the daily restart time and persists it.
    ///
    /// The value must be accepted by [`parse_time`]; otherwise nothing is stored.
    pub async fn set_daily_time(&self, time: &str) -> Result<(), RestartError> {
        parse_time(time, self.clock.now())?;
        let mut cfg = self.config.write().await;
        cfg.daily_restart_time = time.trim().to_string();
        self.persist(&cfg);
        Ok(())
    }

    /// Scheduled time of the pending restart.
    pub async fn next_scheduled(&self) -> Option<DateTime<Utc>> {
        self.controller.next_scheduled().await
    }

    /// Why the pending restart was armed.
    pub async fn pending_reason(&self) -> Option<RestartReason> {
        self.controller.reason().await
    }

    pub async fn is_recurring_daily_enabled(&self) -> bool {
        self.config.read().await.enable_daily_restart
    }

    /// True while a countdown is running.
    pub async fn is_active(&self) -> bool {
        self.controller.is_active().await
    }

    /// Current status; a running native restart takes precedence.
    pub async fn status(&self) -> RestartStatus {
        self.controller.status().await
    }

    /// Cancels the native restart if one is running, otherwise the pending restart.
    ///
    /// A failed native cancel is returned as is and nothing else is cancelled.
    pub async fn cancel(&self) -> Result<Cancelled, RestartError> {
        let native = self.controller.native();
        if native.is_active() {
            native.cancel()?;
            self.native_cancelled();
            return Ok(Cancelled::Native);
        }
        self.controller.cancel().await?;
        Ok(Cancelled::Scheduled)
    }

    /// Reacts to a component update signal according to the live config.
    pub async fn on_update(&self, signal: UpdateSignal) -> UpdateOutcome {
        info!(component = %signal.component, version = %signal.version, "{} got updated", signal.component);

        let plan = {
            let cfg = self.config.read().await;
            plan_update(&cfg, signal.component, self.clock.now())
        };

        match plan {
            UpdatePlan::Arm {
                at,
                reason,
                admission,
            } => {
                if self.controller.submit(at, reason, admission).await {
                    UpdateOutcome::Armed { at }
                } else {
                    UpdateOutcome::Ignored(IgnoreReason::AlreadyActive)
                }
            }
            UpdatePlan::Ignore(why) => {
                match &why {
                    IgnoreReason::InvalidTime(e) => {
                        warn!(component = %signal.component, label = e.as_label(), "update restart skipped: {e}")
                    }
                    other => debug!(component = %signal.component, reason = ?other, "update signal ignored"),
                }
                UpdateOutcome::Ignored(why)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------------

    /// Parses and executes an operator command line, returning the reply text.
    pub async fn dispatch(&self, args: &[&str]) -> String {
        match Command::parse(args) {
            Ok(command) => self.execute(command).await,
            Err(e) => {
                debug!(label = e.as_label(), "{e}");
                match e {
                    CommandError::UnknownCommand { .. } => self.messages.unknown_command.clone(),
                    CommandError::WrongNumberOfArguments { .. } => {
                        self.messages.wrong_number_of_arguments.clone()
                    }
                }
            }
        }
    }

    /// Executes a parsed command, returning the reply text.
    pub async fn execute(&self, command: Command) -> String {
        let m = &self.messages;
        match command {
            Command::Cancel => match self.cancel().await {
                Ok(Cancelled::Native) => m.native_restart_cancel.clone(),
                Ok(Cancelled::Scheduled) => m.restart_cancel.clone(),
                Err(RestartError::NoActiveRestart) => m.no_restart_ongoing.clone(),
                Err(RestartError::NativeCancelFailed { reason }) => {
                    warn!(%reason, "native restart could not be cancelled");
                    m.native_restart_cancel_failed(&reason)
                }
                Err(RestartError::InvalidTimeFormat { .. }) => m.wrong_time_format.clone(),
            },
            Command::Restart { time } => {
                let now = self.clock.now();
                let at = match time {
                    None => now + ChronoDuration::seconds(ADMIN_RESTART_DELAY_SECS),
                    Some(raw) => match parse_time(&raw, now) {
                        Ok(at) => at,
                        Err(e) => {
                            debug!(label = e.as_label(), "{e}");
                            return m.wrong_time_format.clone();
                        }
                    },
                };
                self.controller
                    .arm(at, RestartReason::AdminRequested)
                    .await;
                m.restart_initialized.clone()
            }
            Command::Status => {
                let status = self.status().await;
                match status.scheduled_at() {
                    Some(at) => m.status_with_time(status.label(), &format_timestamp(at)),
                    None => m.status(status.label()),
                }
            }
            Command::TestNotify => {
                if self.controller.send_test_notice().await {
                    m.test_sent.clone()
                } else {
                    m.no_external_sink.clone()
                }
            }
            Command::Help => m.help.clone(),
        }
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Event bus; call [`Bus::subscribe`] for a raw event stream.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Message templates in use.
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Snapshot of the live configuration.
    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    /// Spawns the task that forwards bus events to `set` until `token` fires.
    ///
    /// The task owns the set: on cancellation it hands over the events still
    /// buffered in its receiver, then shuts the set down and waits for the
    /// subscriber workers to drain their queues.
    pub(crate) fn subscriber_listener(
        bus: &Bus,
        set: SubscriberSet,
        token: CancellationToken,
    ) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                select! {
                    biased;
                    ev = rx.recv() => match ev {
                        Ok(ev) => set.emit(&ev),
                        Err(RecvError::Lagged(n)) => warn!(skipped = n, "subscriber listener lagged"),
                        Err(RecvError::Closed) => break,
                    },
                    _ = token.cancelled() => break,
                }
            }
            loop {
                match rx.try_recv() {
                    Ok(ev) => set.emit(&ev),
                    Err(TryRecvError::Lagged(n)) => warn!(skipped = n, "subscriber listener lagged"),
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
            set.shutdown().await;
            debug!("subscriber listener stopped");
        })
    }

    fn native_cancelled(&self) {
        info!("native restart cancelled");
        self.bus.publish(Event::new(EventKind::NativeRestartCancelled));
    }

    fn persist(&self, cfg: &Config) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = cfg.save(path) {
            warn!(path = %path.display(), label = e.as_label(), "failed to persist config: {e}");
        }
    }
}
