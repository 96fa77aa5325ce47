use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::display::{
    DisplayEvent, DisplaySink, MessageEvent, MilestoneEvent, SessionStartedEvent, SessionSummary,
    TickEvent,
};
use crate::messages::{self, DEFAULT_SESSION_LABEL};
use crate::stats::{procrastination_ratio, productivity_score, StatsStore};

use super::state::Session;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

/// How long the "streak lost" notice stays up before reverting to a
/// neutral message.
const STREAK_LOST_REVERT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSnapshot {
    pub session: Session,
    pub progress_percent: f64,
}

struct TickerGuard {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the session state machine, the periodic tick source, and the stop
/// pipeline into the stats store. Display output goes through the sinks
/// attached at construction; the controller never renders anything itself.
#[derive(Clone)]
pub struct SessionTracker {
    session: Arc<Mutex<Session>>,
    stats: StatsStore,
    sinks: Arc<Vec<Box<dyn DisplaySink>>>,
    ticker: Arc<Mutex<Option<TickerGuard>>>,
    tick_interval: Duration,
}

impl SessionTracker {
    pub fn new(stats: StatsStore, sinks: Vec<Box<dyn DisplaySink>>) -> Self {
        Self::with_tick_interval(stats, sinks, Duration::from_secs(1))
    }

    /// A long interval effectively disables the built-in tick source so an
    /// external scheduler can drive `on_tick` itself.
    pub fn with_tick_interval(
        stats: StatsStore,
        sinks: Vec<Box<dyn DisplaySink>>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            stats,
            sinks: Arc::new(sinks),
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
        }
    }

    pub async fn snapshot(&self) -> TrackerSnapshot {
        let session = self.session.lock().await;
        TrackerSnapshot {
            progress_percent: session.progress_percent(),
            session: session.clone(),
        }
    }

    /// Begins a fresh session. Rejected while one is already running;
    /// valid again once the previous session was stopped.
    pub async fn start(&self, label: Option<String>) -> Result<()> {
        let (session_id, label) = {
            let mut session = self.session.lock().await;
            if session.is_active() {
                bail!("session already active");
            }
            let session_id = Uuid::new_v4().to_string();
            let label = label
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_LABEL.to_string());
            session.begin(session_id.clone(), label.clone());
            (session_id, label)
        };

        self.spawn_ticker().await;

        log_info!("session {session_id} started ({label})");
        self.emit(&DisplayEvent::SessionStarted(SessionStartedEvent {
            session_id,
            label,
        }));
        Ok(())
    }

    /// Switches time attribution to procrastination and emits a satirical
    /// message. Repeated pauses keep counting; pausing without an active
    /// session is a no-op. There is no resume short of a fresh start.
    pub async fn pause(&self) {
        let pause_count = {
            let mut session = self.session.lock().await;
            if !session.is_active() {
                log::debug!("pause ignored: no active session");
                return;
            }
            session.mark_paused()
        };

        let text = {
            let mut rng = rand::thread_rng();
            messages::pick_pause_message(pause_count, &mut rng).to_string()
        };
        self.emit(&DisplayEvent::MessageShown(MessageEvent { text }));
    }

    /// Ends the session: streak check, penalty check, stats hand-off,
    /// summary emission, then reset to idle.
    pub async fn stop(&self) -> Result<()> {
        let (session_id, focus_seconds, procrastination_seconds) = {
            let mut session = self.session.lock().await;
            if !session.is_active() {
                log::debug!("stop ignored: no active session");
                return Ok(());
            }
            session.stop();
            (
                session.session_id.clone().unwrap_or_default(),
                session.focus_seconds,
                session.procrastination_seconds,
            )
        };

        self.cancel_ticker().await;

        let today = Utc::now().date_naive();
        self.stats.check_and_update_streak(today).await?;

        let ratio = procrastination_ratio(focus_seconds, procrastination_seconds);
        if self.stats.penalize_streak(ratio).await? {
            self.emit(&DisplayEvent::StreakLost);
            self.schedule_streak_lost_revert();
        }

        let aggregate = self
            .stats
            .record_session_end(today, focus_seconds, procrastination_seconds)
            .await?;
        log_info!(
            "session {session_id} stopped: focus {focus_seconds}s, procrastination {procrastination_seconds}s, day score {}",
            aggregate.score
        );

        let summary = SessionSummary {
            session_id,
            focus_seconds,
            procrastination_seconds,
            score: productivity_score(focus_seconds, procrastination_seconds),
            streak: self.stats.streak().await,
        };
        self.emit(&DisplayEvent::SessionEnded(summary));

        self.session.lock().await.reset();
        Ok(())
    }

    /// Tick-source entry point. Credits `delta_seconds` to the current
    /// phase, emits any milestone crossings followed by a tick update, and
    /// returns false once no session is active.
    pub async fn on_tick(&self, delta_seconds: u64) -> bool {
        if delta_seconds == 0 {
            return true;
        }

        let (crossed, update) = {
            let mut session = self.session.lock().await;
            if !session.is_active() {
                return false;
            }
            let crossed = session.tick(delta_seconds);
            let update = TickEvent {
                focus_seconds: session.focus_seconds,
                procrastination_seconds: session.procrastination_seconds,
                stopwatch_seconds: session.stopwatch_seconds,
                progress_percent: session.progress_percent(),
            };
            (crossed, update)
        };

        for threshold_seconds in crossed {
            self.emit(&DisplayEvent::MilestoneReached(MilestoneEvent {
                threshold_seconds,
            }));
        }
        self.emit(&DisplayEvent::Tick(update));
        true
    }

    /// Stops the tick source without finalizing anything; the session
    /// state is left as-is.
    pub async fn dispose(&self) {
        self.cancel_ticker().await;
    }

    async fn spawn_ticker(&self) {
        self.cancel_ticker().await;

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let tracker = self.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(tick_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; consume it so the
            // anchor lines up with the session start.
            ticker.tick().await;
            let anchor = Instant::now();
            let mut credited: u64 = 0;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // Credit whole wall-clock seconds since the anchor,
                        // so scheduler jitter never loses or double-counts.
                        let elapsed = anchor.elapsed().as_secs();
                        let delta = elapsed.saturating_sub(credited);
                        if delta == 0 {
                            continue;
                        }
                        credited = elapsed;
                        if !tracker.on_tick(delta).await {
                            break;
                        }
                    }
                    _ = token.cancelled() => break,
                }
            }
        });

        *self.ticker.lock().await = Some(TickerGuard { cancel, handle });
    }

    async fn cancel_ticker(&self) {
        if let Some(guard) = self.ticker.lock().await.take() {
            guard.cancel.cancel();
            if let Err(err) = guard.handle.await {
                log_error!("ticker task failed to join: {err}");
            }
        }
    }

    fn schedule_streak_lost_revert(&self) {
        let sinks = self.sinks.clone();
        tokio::spawn(async move {
            time::sleep(STREAK_LOST_REVERT).await;
            let event = DisplayEvent::MessageShown(MessageEvent {
                text: messages::STREAK_LOST_FOLLOWUP.to_string(),
            });
            for sink in sinks.iter() {
                sink.deliver(&event);
            }
        });
    }

    fn emit(&self, event: &DisplayEvent) {
        for sink in self.sinks.iter() {
            sink.deliver(event);
        }
    }
}
