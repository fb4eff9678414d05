use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use tokio::sync::broadcast;

use rebootvisor::{
    Cancelled, Clock, Component, Config, Event, EventKind, ExternalNotice, ExternalSink, Host,
    IgnoreReason, NativeRestartGuard, NoNativeRestart, NoticeStatus, NotifyError, RestartError,
    RestartReason, RestartStatus, Scheduler, Subscribe, UpdateMethod, UpdateOutcome, UpdateSignal,
};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
enum HostCall {
    Broadcast(String),
    Kick(String),
    Shutdown,
}

#[derive(Default)]
struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    fn broadcasts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Broadcast(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    fn shut_down(&self) -> bool {
        self.calls().contains(&HostCall::Shutdown)
    }
}

impl Host for RecordingHost {
    fn broadcast(&self, message: &str, _avatar_id: u64) {
        self.calls
            .lock()
            .unwrap()
            .push(HostCall::Broadcast(message.to_string()));
    }

    fn kick_all(&self, reason: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(HostCall::Kick(reason.to_string()));
    }

    fn shutdown(&self) {
        self.calls.lock().unwrap().push(HostCall::Shutdown);
    }

    fn hostname(&self) -> String {
        "test-host".to_string()
    }
}

#[derive(Default)]
struct RecordingSink {
    notices: Mutex<Vec<ExternalNotice>>,
}

impl RecordingSink {
    fn statuses(&self) -> Vec<NoticeStatus> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.status)
            .collect()
    }
}

#[async_trait]
impl ExternalSink for RecordingSink {
    async fn deliver(&self, notice: &ExternalNotice) -> Result<(), NotifyError> {
        self.notices.lock().unwrap().push(notice.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

struct FailingSink;

#[async_trait]
impl ExternalSink for FailingSink {
    async fn deliver(&self, _notice: &ExternalNotice) -> Result<(), NotifyError> {
        Err(NotifyError::HttpStatus(500))
    }
}

/// Slow on Init, fast otherwise: concurrent deliveries would finish out of order.
#[derive(Default)]
struct SlowInitSink {
    inner: RecordingSink,
}

#[async_trait]
impl ExternalSink for SlowInitSink {
    async fn deliver(&self, notice: &ExternalNotice) -> Result<(), NotifyError> {
        let delay = match notice.status {
            NoticeStatus::Initialized => 50,
            _ => 1,
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.inner.deliver(notice).await
    }
}

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

struct FakeNative {
    active: AtomicBool,
    refuse: bool,
}

impl FakeNative {
    fn running(refuse: bool) -> Arc<Self> {
        Arc::new(Self {
            active: AtomicBool::new(true),
            refuse,
        })
    }
}

impl NativeRestartGuard for FakeNative {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn cancel(&self) -> Result<(), RestartError> {
        if self.refuse {
            return Err(RestartError::NativeCancelFailed {
                reason: "restart routine not reachable".to_string(),
            });
        }
        self.active.store(false, Ordering::SeqCst);
        Ok(())
    }
}

struct KindRecorder(Mutex<Vec<EventKind>>);

#[async_trait]
impl Subscribe for KindRecorder {
    async fn on_event(&self, event: &Event) {
        self.0.lock().unwrap().push(event.kind);
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 3, 0, 0).unwrap()
}

fn secs(n: i64) -> DateTime<Utc> {
    now() + ChronoDuration::seconds(n)
}

struct Harness {
    scheduler: Arc<Scheduler>,
    host: Arc<RecordingHost>,
    sink: Arc<RecordingSink>,
    events: broadcast::Receiver<Event>,
}

impl Harness {
    fn new(cfg: Config) -> Self {
        Self::with_native(cfg, Arc::new(NoNativeRestart))
    }

    fn with_native(cfg: Config, native: Arc<dyn NativeRestartGuard>) -> Self {
        let host = Arc::new(RecordingHost::default());
        let sink = Arc::new(RecordingSink::default());
        let scheduler = Scheduler::builder(cfg, host.clone())
            .with_clock(Arc::new(FixedClock(now())))
            .with_native_guard(native)
            .with_external_sink(sink.clone())
            .build();
        let events = scheduler.bus().subscribe();
        Self {
            scheduler,
            host,
            sink,
            events,
        }
    }

    fn drain(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(ev) = self.events.try_recv() {
            out.push(ev);
        }
        out
    }
}

fn external_on() -> Config {
    Config {
        enable_discord_notification: true,
        ..Config::default()
    }
}

async fn advance(n: u64) {
    tokio::time::sleep(Duration::from_secs(n)).await;
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_sixty_five_second_countdown_then_fire() {
    let mut h = Harness::new(Config::default());
    h.scheduler.arm_at(secs(65)).await;
    assert!(h.scheduler.is_active().await);

    advance(66).await;

    let events = h.drain();
    let ticks: Vec<u64> = events
        .iter()
        .filter(|e| e.kind == EventKind::RestartTick)
        .filter_map(|e| e.seconds_left)
        .collect();
    assert_eq!(ticks, vec![60, 30, 10, 5, 4, 3, 2, 1, 0]);
    assert_eq!(events.first().map(|e| e.kind), Some(EventKind::RestartArmed));
    assert_eq!(events.first().and_then(|e| e.seconds_left), Some(65));
    assert_eq!(events.last().map(|e| e.kind), Some(EventKind::RestartFiring));
    assert!(events.iter().all(|e| e.reason == Some(RestartReason::ApiCall)));

    let broadcasts = h.host.broadcasts();
    assert_eq!(
        broadcasts.first().map(String::as_str),
        Some("The server is restarting in 1m 5s due to ApiCall!")
    );
    assert_eq!(broadcasts[1], "The server is restarting in 1m!");
    assert_eq!(broadcasts.len(), 10);

    let calls = h.host.calls();
    assert_eq!(
        &calls[calls.len() - 2..],
        &[
            HostCall::Kick("The server is restarting for update.".to_string()),
            HostCall::Shutdown
        ]
    );

    assert!(!h.scheduler.is_active().await);
    assert_eq!(h.scheduler.status().await, RestartStatus::NoRestartPlanned);
}

#[tokio::test(start_paused = true)]
async fn test_nothing_happens_before_first_checkpoint() {
    let mut h = Harness::new(Config::default());
    h.scheduler.arm_at(secs(65)).await;

    advance(4).await;

    let kinds: Vec<EventKind> = h.drain().into_iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::RestartArmed]);
    assert_eq!(h.host.broadcasts().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_past_target_fires_without_ticks() {
    let mut h = Harness::new(Config::default());
    h.scheduler.arm_at(secs(-5)).await;

    advance(1).await;

    let kinds: Vec<EventKind> = h.drain().into_iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::RestartArmed, EventKind::RestartFiring]);
    assert!(h.host.shut_down());
}

#[tokio::test(start_paused = true)]
async fn test_rearm_cancels_previous_before_init() {
    let mut h = Harness::new(Config::default());
    h.scheduler.arm_at(secs(100)).await;
    h.scheduler.arm_at(secs(50)).await;

    let early: Vec<(EventKind, Option<u64>)> =
        h.drain().into_iter().map(|e| (e.kind, e.arm)).collect();
    assert_eq!(
        early,
        vec![
            (EventKind::RestartArmed, Some(1)),
            (EventKind::RestartCancelled, Some(1)),
            (EventKind::RestartArmed, Some(2)),
        ]
    );
    assert_eq!(h.scheduler.next_scheduled().await, Some(secs(50)));

    advance(200).await;

    let late = h.drain();
    assert!(late.iter().all(|e| e.arm == Some(2)));
    assert_eq!(
        late.iter()
            .filter(|e| e.kind == EventKind::RestartFiring)
            .count(),
        1
    );
    assert_eq!(
        h.host
            .calls()
            .iter()
            .filter(|c| **c == HostCall::Shutdown)
            .count(),
        1
    );
}

// ---------------------------------------------------------------------------
// Cancel
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_cancel_when_idle() {
    let mut h = Harness::new(Config::default());

    assert_eq!(
        h.scheduler.cancel().await,
        Err(RestartError::NoActiveRestart)
    );
    assert_eq!(
        h.scheduler.dispatch(&["cancel"]).await,
        "There is no restart on going!"
    );
    assert!(h.drain().is_empty());
    assert!(h.host.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_no_tick_or_fire_after_cancel() {
    let mut h = Harness::new(Config::default());
    h.scheduler.arm_at(secs(65)).await;

    advance(20).await;
    assert_eq!(
        h.scheduler.cancel().await,
        Ok(Cancelled::Scheduled)
    );
    let before = h.drain();
    assert_eq!(before.last().map(|e| e.kind), Some(EventKind::RestartCancelled));

    advance(120).await;

    assert!(h.drain().is_empty());
    assert!(!h.host.shut_down());
    assert_eq!(
        h.host.broadcasts().last().map(String::as_str),
        Some("The restart has been cancelled.")
    );
    assert!(!h.scheduler.is_active().await);
}

// ---------------------------------------------------------------------------
// External notices
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_external_final_notice_sent_once_per_arm() {
    let h = Harness::new(external_on());
    h.scheduler.arm_at(secs(65)).await;

    advance(66).await;

    assert_eq!(
        h.sink.statuses(),
        vec![NoticeStatus::Initialized, NoticeStatus::Now]
    );
    let notices = h.sink.notices.lock().unwrap();
    assert_eq!(notices[1].seconds_left, Some(5));
    assert_eq!(notices[1].title, "test-host");
}

#[tokio::test(start_paused = true)]
async fn test_external_cancel_notice() {
    let h = Harness::new(external_on());
    h.scheduler.arm_at(secs(30)).await;
    h.scheduler.cancel().await.unwrap();

    advance(1).await;

    assert_eq!(
        h.sink.statuses(),
        vec![NoticeStatus::Initialized, NoticeStatus::Canceled]
    );
}

#[tokio::test(start_paused = true)]
async fn test_external_notices_delivered_in_arm_order() {
    let sink = Arc::new(SlowInitSink::default());
    let scheduler = Scheduler::builder(external_on(), Arc::new(RecordingHost::default()))
        .with_clock(Arc::new(FixedClock(now())))
        .with_external_sink(sink.clone())
        .build();

    scheduler.arm_at(secs(100)).await;
    scheduler.cancel().await.unwrap();
    advance(1).await;

    assert_eq!(
        sink.inner.statuses(),
        vec![NoticeStatus::Initialized, NoticeStatus::Canceled]
    );

    // A replaced arm is cancelled before the next one is announced.
    scheduler.arm_at(secs(100)).await;
    scheduler.arm_at(secs(50)).await;
    advance(1).await;

    let arms: Vec<(NoticeStatus, Option<u64>)> = sink
        .inner
        .notices
        .lock()
        .unwrap()
        .iter()
        .map(|n| (n.status, n.arm))
        .collect();
    assert_eq!(
        arms[2..].to_vec(),
        vec![
            (NoticeStatus::Initialized, Some(2)),
            (NoticeStatus::Canceled, Some(2)),
            (NoticeStatus::Initialized, Some(3)),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_external_disabled_sends_only_test_notice() {
    let h = Harness::new(Config::default());
    h.scheduler.arm_at(secs(65)).await;

    assert_eq!(
        h.scheduler.dispatch(&["testNotify"]).await,
        "Test message sent to discord!"
    );
    advance(66).await;

    let notices = h.sink.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].status, NoticeStatus::Test);
    assert_eq!(notices[0].scheduled_at, Some(secs(65)));
}

#[tokio::test(start_paused = true)]
async fn test_delivery_failure_is_published_not_surfaced() {
    let host = Arc::new(RecordingHost::default());
    let scheduler = Scheduler::builder(external_on(), host.clone())
        .with_clock(Arc::new(FixedClock(now())))
        .with_external_sink(Arc::new(FailingSink))
        .build();
    let mut rx = scheduler.bus().subscribe();

    scheduler.arm_at(secs(30)).await;
    advance(1).await;

    let mut failed = None;
    while let Ok(ev) = rx.try_recv() {
        if ev.kind == EventKind::ExternalDeliveryFailed {
            failed = Some(ev);
        }
    }
    let failed = failed.expect("delivery failure event");
    assert_eq!(failed.arm, Some(1));
    assert_eq!(failed.error.as_deref(), Some("webhook returned HTTP 500"));
    assert!(scheduler.is_active().await);
}

// ---------------------------------------------------------------------------
// Update signals
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_cooldown_update_replaces_pending_restart() {
    let h = Harness::new(Config::default());
    h.scheduler.arm_at(secs(3600)).await;

    let outcome = h
        .scheduler
        .on_update(UpdateSignal::new(Component::Server, "2024.3.1"))
        .await;

    assert_eq!(outcome, UpdateOutcome::Armed { at: secs(300) });
    assert_eq!(h.scheduler.next_scheduled().await, Some(secs(300)));
}

#[tokio::test(start_paused = true)]
async fn test_daily_time_update_with_daily_restart_disabled_arms_nothing() {
    let mut cfg = Config::default();
    cfg.hooks.method = UpdateMethod::DailyTime;
    cfg.enable_daily_restart = false;
    let mut h = Harness::new(cfg);

    let outcome = h
        .scheduler
        .on_update(UpdateSignal::new(Component::Oxide, "2.0.6000"))
        .await;

    assert_eq!(
        outcome,
        UpdateOutcome::Ignored(IgnoreReason::DailyRestartDisabled)
    );
    assert!(!h.scheduler.is_active().await);
    assert!(h.drain().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_daily_time_update_keeps_pending_restart() {
    let mut cfg = Config::default();
    cfg.hooks.method = UpdateMethod::DailyTime;
    cfg.enable_daily_restart = true;
    let h = Harness::new(cfg);
    h.scheduler.arm_at(secs(600)).await;

    let outcome = h
        .scheduler
        .on_update(UpdateSignal::new(Component::Oxide, "2.0.6000"))
        .await;

    assert_eq!(outcome, UpdateOutcome::Ignored(IgnoreReason::AlreadyActive));
    assert_eq!(h.scheduler.next_scheduled().await, Some(secs(600)));
}

#[tokio::test(start_paused = true)]
async fn test_daily_time_update_arms_next_daily_time() {
    let mut cfg = Config::default();
    cfg.hooks.method = UpdateMethod::DailyTime;
    cfg.enable_daily_restart = true;
    let h = Harness::new(cfg);

    let outcome = h
        .scheduler
        .on_update(UpdateSignal::new(Component::Server, "build 42"))
        .await;

    assert_eq!(outcome, UpdateOutcome::Armed { at: secs(3600) });
}

#[tokio::test(start_paused = true)]
async fn test_missing_update_source_disables_update_restarts() {
    let scheduler = Scheduler::builder(Config::default(), Arc::new(RecordingHost::default()))
        .with_clock(Arc::new(FixedClock(now())))
        .with_update_source(false)
        .build();

    let outcome = scheduler
        .on_update(UpdateSignal::new(Component::Server, "2024.3.1"))
        .await;

    assert_eq!(outcome, UpdateOutcome::Ignored(IgnoreReason::NoticeDisabled));
    assert!(!scheduler.config().await.enable_update_notice);
    assert!(!scheduler.is_active().await);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_component_is_ignored() {
    let h = Harness::new(Config::default());
    let outcome = h
        .scheduler
        .on_update(UpdateSignal::new(Component::Carbon, "1.0"))
        .await;
    assert_eq!(
        outcome,
        UpdateOutcome::Ignored(IgnoreReason::ComponentDisabled)
    );
    assert!(!h.scheduler.is_active().await);
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_restart_command_without_argument_arms_in_ten_seconds() {
    let mut h = Harness::new(Config::default());

    assert_eq!(
        h.scheduler.dispatch(&["restart"]).await,
        "Restart has been initialized."
    );
    assert_eq!(h.scheduler.next_scheduled().await, Some(secs(10)));
    assert_eq!(
        h.drain().first().and_then(|e| e.reason),
        Some(RestartReason::AdminRequested)
    );
}

#[tokio::test(start_paused = true)]
async fn test_restart_command_with_bad_time_arms_nothing() {
    let mut h = Harness::new(Config::default());

    let reply = h.scheduler.dispatch(&["restart", "bad"]).await;
    assert!(reply.starts_with("Wrong time format!"));
    assert!(!h.scheduler.is_active().await);
    assert!(h.drain().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_restart_command_with_time_of_day() {
    let h = Harness::new(Config::default());
    h.scheduler.dispatch(&["restart", "02:30:00"]).await;
    assert_eq!(
        h.scheduler.next_scheduled().await,
        Some(Utc.with_ymd_and_hms(2024, 3, 2, 2, 30, 0).unwrap())
    );
}

#[tokio::test(start_paused = true)]
async fn test_status_and_unknown_commands() {
    let h = Harness::new(Config::default());
    assert_eq!(
        h.scheduler.dispatch(&["status"]).await,
        "Status: No planned restart"
    );

    h.scheduler.arm_at(secs(3600)).await;
    assert_eq!(
        h.scheduler.dispatch(&["status"]).await,
        "Status: Restarting - 01/03/2024 - 04:00:00 UTC"
    );

    assert_eq!(h.scheduler.dispatch(&["reboot"]).await, "Unknown command!");
    assert_eq!(h.scheduler.dispatch(&[]).await, "Unknown command!");
    assert!(
        h.scheduler
            .dispatch(&["restart", "1", "2"])
            .await
            .starts_with("Wrong number of elements!")
    );
}

// ---------------------------------------------------------------------------
// Native restart
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_native_restart_takes_precedence() {
    let native = FakeNative::running(false);
    let mut h = Harness::with_native(Config::default(), native.clone());
    h.scheduler.arm_at(secs(600)).await;

    assert_eq!(
        h.scheduler.status().await,
        RestartStatus::NativeRestartInProgress
    );
    assert_eq!(
        h.scheduler.dispatch(&["status"]).await,
        "Status: Restarting (Native)"
    );

    assert_eq!(
        h.scheduler.dispatch(&["cancel"]).await,
        "Native restart was cancelled."
    );
    assert!(!native.is_active());
    assert!(h.scheduler.is_active().await);
    assert!(
        h.drain()
            .iter()
            .any(|e| e.kind == EventKind::NativeRestartCancelled)
    );

    assert_eq!(
        h.scheduler.status().await,
        RestartStatus::RestartScheduled { at: secs(600) }
    );
}

#[tokio::test(start_paused = true)]
async fn test_native_cancel_failure_cancels_nothing() {
    let h = Harness::with_native(Config::default(), FakeNative::running(true));
    h.scheduler.arm_at(secs(600)).await;

    let err = h.scheduler.cancel().await.unwrap_err();
    assert_eq!(err.as_label(), "restart_native_cancel_failed");
    assert!(h.scheduler.is_active().await);

    let reply = h.scheduler.dispatch(&["cancel"]).await;
    assert!(reply.contains("restart routine not reachable"));
}

// ---------------------------------------------------------------------------
// Lifecycle and API
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_start_arms_daily_restart_when_enabled() {
    let cfg = Config {
        enable_daily_restart: true,
        ..Config::default()
    };
    let mut h = Harness::new(cfg);
    h.scheduler.start().await;

    assert_eq!(h.scheduler.next_scheduled().await, Some(secs(3600)));
    assert_eq!(
        h.drain().first().and_then(|e| e.reason),
        Some(RestartReason::DailyRestart)
    );
}

#[tokio::test(start_paused = true)]
async fn test_start_skips_invalid_daily_time() {
    let cfg = Config {
        enable_daily_restart: true,
        daily_restart_time: "4am".to_string(),
        ..Config::default()
    };
    let h = Harness::new(cfg);
    h.scheduler.start().await;
    assert!(!h.scheduler.is_active().await);
}

#[tokio::test(start_paused = true)]
async fn test_daily_settings_are_validated_and_persisted() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("RebootScheduler.json");

    let scheduler = Scheduler::builder(Config::default(), Arc::new(RecordingHost::default()))
        .with_clock(Arc::new(FixedClock(now())))
        .with_external_sink(Arc::new(RecordingSink::default()))
        .with_config_path(&path)
        .build();

    scheduler.enable_recurring_daily(true).await;
    scheduler.set_daily_time("05:30:00").await?;
    assert!(scheduler.is_recurring_daily_enabled().await);

    let err = scheduler.set_daily_time("5:30").await.unwrap_err();
    assert_eq!(err.as_label(), "restart_invalid_time");

    let saved = Config::load(&path)?;
    assert!(saved.enable_daily_restart);
    assert_eq!(saved.daily_restart_time, "05:30:00");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_unload_cancels_native_and_pending_restart() {
    let native = FakeNative::running(false);
    let h = Harness::with_native(Config::default(), native.clone());
    h.scheduler.arm_at(secs(65)).await;

    h.scheduler.unload().await;
    advance(100).await;

    assert!(!native.is_active());
    assert!(!h.scheduler.is_active().await);
    assert!(!h.host.shut_down());
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_receive_lifecycle_events() {
    let recorder = Arc::new(KindRecorder(Mutex::new(Vec::new())));
    let subs: Vec<Arc<dyn Subscribe>> = vec![recorder.clone()];
    let scheduler = Scheduler::builder(Config::default(), Arc::new(RecordingHost::default()))
        .with_clock(Arc::new(FixedClock(now())))
        .with_external_sink(Arc::new(RecordingSink::default()))
        .with_subscribers(subs)
        .build();

    scheduler.arm_at(secs(2)).await;
    advance(3).await;

    assert_eq!(
        *recorder.0.lock().unwrap(),
        vec![
            EventKind::RestartArmed,
            EventKind::RestartTick,
            EventKind::RestartTick,
            EventKind::RestartFiring,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_unload_drains_subscribers_before_returning() {
    let recorder = Arc::new(KindRecorder(Mutex::new(Vec::new())));
    let subs: Vec<Arc<dyn Subscribe>> = vec![recorder.clone()];
    let scheduler = Scheduler::builder(Config::default(), Arc::new(RecordingHost::default()))
        .with_clock(Arc::new(FixedClock(now())))
        .with_subscribers(subs)
        .build();

    scheduler.arm_at(secs(65)).await;
    scheduler.unload().await;

    assert_eq!(
        *recorder.0.lock().unwrap(),
        vec![EventKind::RestartArmed, EventKind::RestartCancelled]
    );

    scheduler.unload().await;
    scheduler.arm_at(secs(5)).await;
    advance(10).await;
    assert_eq!(recorder.0.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_pending_reason_follows_arm() {
    let h = Harness::new(Config::default());
    assert_eq!(h.scheduler.pending_reason().await, None);

    h.scheduler.arm_at(secs(65)).await;
    assert_eq!(
        h.scheduler.pending_reason().await,
        Some(RestartReason::ApiCall)
    );

    h.scheduler.dispatch(&["restart", "30"]).await;
    assert_eq!(
        h.scheduler.pending_reason().await,
        Some(RestartReason::AdminRequested)
    );

    h.scheduler.cancel().await.unwrap();
    assert_eq!(h.scheduler.pending_reason().await, None);
}
