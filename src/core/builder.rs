use std::{path::PathBuf, sync::Arc};

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::{
    clock::{Clock, SystemClock},
    core::{
        config::Config,
        controller::{Controller, ControllerConfig},
        scheduler::Scheduler,
    },
    events::Bus,
    host::{Host, NativeRestartGuard, NoNativeRestart},
    notify::{ExternalSink, Messages, Notifier},
    subscribers::{Subscribe, SubscriberSet},
};

/// Default capacity of the event bus.
pub const DEFAULT_BUS_CAPACITY: usize = 1024;

/// Builder for constructing a [`Scheduler`] with optional collaborators.
///
/// The restart controller and its notifier are wired here and stay internal:
///
/// ```compile_fail
/// use rebootvisor::{Controller, Notifier};
/// ```
pub struct SchedulerBuilder {
    cfg: Config,
    host: Arc<dyn Host>,
    clock: Arc<dyn Clock>,
    native: Arc<dyn NativeRestartGuard>,
    external: Option<Arc<dyn ExternalSink>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    messages: Messages,
    config_path: Option<PathBuf>,
    bus_capacity: usize,
    update_source: bool,
}

impl SchedulerBuilder {
    /// Creates a new builder with the given configuration and host.
    pub fn new(cfg: Config, host: Arc<dyn Host>) -> Self {
        Self {
            cfg,
            host,
            clock: Arc::new(SystemClock),
            native: Arc::new(NoNativeRestart),
            external: None,
            subscribers: Vec::new(),
            messages: Messages::default(),
            config_path: None,
            bus_capacity: DEFAULT_BUS_CAPACITY,
            update_source: true,
        }
    }

    /// Replaces the system clock (tests use a fixed one).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Gives the scheduler access to the host's own restart routine.
    pub fn with_native_guard(mut self, guard: Arc<dyn NativeRestartGuard>) -> Self {
        self.native = guard;
        self
    }

    /// Sets the external notification sink.
    ///
    /// Without one, the `webhook` feature builds a Discord webhook sink from
    /// `discordWebhook` / `discordRoleId`. Countdown notices reach the sink only
    /// when `enableDiscordNotification` is set.
    pub fn with_external_sink(mut self, sink: Arc<dyn ExternalSink>) -> Self {
        self.external = Some(sink);
        self
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive runtime events through dedicated workers with bounded
    /// queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Overrides the message templates.
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Persists API-driven config changes to `path`.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Declares whether the host has an update-notice source wired to
    /// [`Scheduler::on_update`] (default: yes).
    ///
    /// Without one, update-triggered restarts are switched off in the live config
    /// so that `enableUpdateNotice` cannot promise restarts that never come.
    pub fn with_update_source(mut self, available: bool) -> Self {
        self.update_source = available;
        self
    }

    /// Sets the event bus capacity (minimum 1).
    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.bus_capacity = capacity;
        self
    }

    /// Builds the scheduler.
    ///
    /// Must be called from within a tokio runtime: subscriber workers, the bus
    /// listener and the external delivery worker are spawned here. Nothing is
    /// armed until `Scheduler::start`.
    pub fn build(self) -> Arc<Scheduler> {
        let mut cfg = self.cfg;
        if !self.update_source && cfg.enable_update_notice {
            warn!("{}", self.messages.update_source_missing);
            cfg.enable_update_notice = false;
        }

        let bus = Bus::new(self.bus_capacity);
        let listener_token = CancellationToken::new();
        let listener = Scheduler::subscriber_listener(
            &bus,
            SubscriberSet::new(self.subscribers),
            listener_token.clone(),
        );
        let messages = Arc::new(self.messages);

        let mut notifier = Notifier::new(
            bus.clone(),
            Arc::clone(&self.host),
            Arc::clone(&messages),
            cfg.chat_avatar_id,
        );
        if let Some(sink) = self.external.or_else(|| default_sink(&cfg)) {
            notifier = notifier.with_external(sink, cfg.enable_discord_notification);
        }

        let controller = Controller::new(
            ControllerConfig {
                thresholds: cfg.thresholds(),
                kick_message: messages.kick_reason.clone(),
            },
            notifier,
            self.host,
            self.native,
            Arc::clone(&self.clock),
        );

        Arc::new(Scheduler::new_internal(
            controller,
            cfg,
            self.config_path,
            self.clock,
            bus,
            messages,
            listener_token,
            listener,
        ))
    }
}

#[cfg(feature = "webhook")]
fn default_sink(cfg: &Config) -> Option<Arc<dyn ExternalSink>> {
    match crate::notify::DiscordWebhook::new(cfg.discord_webhook.clone(), cfg.mention_role()) {
        Ok(sink) => Some(Arc::new(sink)),
        Err(e) => {
            warn!(label = e.as_label(), "webhook sink unavailable: {e}");
            None
        }
    }
}

#[cfg(not(feature = "webhook"))]
fn default_sink(_cfg: &Config) -> Option<Arc<dyn ExternalSink>> {
    None
}
