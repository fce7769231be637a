//! Telemetry generator task
//!
//! One task per session advances the readouts every tick period and stops
//! after the profile's active duration. The task is owned through a
//! [`TickerGuard`]: dropping the guard cancels the token and aborts the task,
//! which covers `end_session`, replacement and teardown of the whole lobby.

use crate::lobby::LobbyInner;
use sim_lobby_core::{SessionSnapshot, TelemetryProfile};
use std::sync::Weak;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Scoped handle to a running tick task
pub(crate) struct TickerGuard {
    session_id: u64,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl TickerGuard {
    /// Spawn the tick task for `session_id`
    ///
    /// The task only holds a weak reference to the lobby so that dropping the
    /// last lobby handle also drops this guard.
    pub(crate) fn spawn(
        session_id: u64,
        lobby: Weak<Mutex<LobbyInner>>,
        events: broadcast::Sender<SessionSnapshot>,
        profile: TelemetryProfile,
    ) -> Self {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(session_id, lobby, events, profile, cancel.clone()));

        Self {
            session_id,
            cancel,
            handle: Some(handle),
        }
    }

    /// Release the guard from inside the task itself, without aborting it
    fn detach(mut self) {
        self.handle.take();
    }
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Ticker for session {} cancelled", self.session_id);
        }
    }
}

async fn run(
    session_id: u64,
    lobby: Weak<Mutex<LobbyInner>>,
    events: broadcast::Sender<SessionSnapshot>,
    profile: TelemetryProfile,
    cancel: CancellationToken,
) {
    let start = Instant::now();
    let mut ticks = interval_at(start + profile.tick_period, profile.tick_period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let deadline = sleep_until(start + profile.active_duration);
    tokio::pin!(deadline);

    debug!("Ticker for session {} started", session_id);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticks.tick() => {
                if !apply_tick(&lobby, &events, &cancel).await {
                    break;
                }
            }
            _ = &mut deadline => {
                finish(session_id, &lobby, &events, &cancel).await;
                break;
            }
        }
    }

    debug!("Ticker for session {} ended", session_id);
}

/// Apply one tick; returns false once the task should stop
async fn apply_tick(
    lobby: &Weak<Mutex<LobbyInner>>,
    events: &broadcast::Sender<SessionSnapshot>,
    cancel: &CancellationToken,
) -> bool {
    let Some(lobby) = lobby.upgrade() else {
        return false;
    };
    let mut inner = lobby.lock().await;

    // Cancellation happens under this lock, so checking here closes the
    // window between the timer firing and the lock being acquired.
    if cancel.is_cancelled() {
        return false;
    }
    if !inner.controller.tick() {
        return false;
    }

    let snapshot = inner.publish(events);
    debug!(
        "Tick {}: speed {:.1} altitude {:.1} fuel {:.1}",
        snapshot.ticks,
        snapshot.readouts.speed.0,
        snapshot.readouts.altitude.0,
        snapshot.readouts.fuel.0
    );
    true
}

async fn finish(
    session_id: u64,
    lobby: &Weak<Mutex<LobbyInner>>,
    events: &broadcast::Sender<SessionSnapshot>,
    cancel: &CancellationToken,
) {
    let Some(lobby) = lobby.upgrade() else {
        return;
    };
    let mut inner = lobby.lock().await;
    if cancel.is_cancelled() {
        return;
    }

    inner.controller.finish_ticking();
    if let Some(guard) = inner.ticker.take() {
        guard.detach();
    }
    inner.publish(events);

    info!(
        "Session {} finished after {} ticks, readouts frozen",
        session_id,
        inner.controller.state().ticks
    );
}
