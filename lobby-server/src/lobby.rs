//! Shared lobby handle
//!
//! Wraps the synchronous [`SessionController`] in a single async mutex so
//! user actions and ticks are serialized. Every mutation publishes a fresh
//! [`SessionSnapshot`] on a broadcast channel before the lock is released,
//! so subscribers observe changes in the order they happened.

use crate::ticker::TickerGuard;
use sim_lobby_core::model::SessionState;
use sim_lobby_core::{
    Catalogs, LobbyError, RankProgress, SessionController, SessionSnapshot, TelemetryProfile,
};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

/// Capacity of the snapshot broadcast channel
const EVENT_CAPACITY: usize = 100;

/// State guarded by the lobby mutex
pub(crate) struct LobbyInner {
    pub(crate) controller: SessionController,
    /// Tick task of the current session; dropping it stops the task
    pub(crate) ticker: Option<TickerGuard>,
}

impl LobbyInner {
    /// Publish the current snapshot; called with the lock held
    pub(crate) fn publish(&self, events: &broadcast::Sender<SessionSnapshot>) -> SessionSnapshot {
        let snapshot = self.controller.snapshot();
        // No subscribers is fine, they poll or get the next one
        let _ = events.send(snapshot.clone());
        snapshot
    }
}

/// Cloneable handle to the one session of this process
#[derive(Clone)]
pub struct Lobby {
    inner: Arc<Mutex<LobbyInner>>,
    catalogs: Arc<Catalogs>,
    events: broadcast::Sender<SessionSnapshot>,
}

impl Lobby {
    pub fn new(controller: SessionController) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let catalogs = controller.catalogs().clone();

        Self {
            inner: Arc::new(Mutex::new(LobbyInner {
                controller,
                ticker: None,
            })),
            catalogs,
            events,
        }
    }

    pub fn with_profile(
        profile: TelemetryProfile,
        initial_xp: u64,
        seed: Option<u64>,
    ) -> Result<Self, LobbyError> {
        let catalogs = Arc::new(Catalogs::builtin()?);
        let controller = SessionController::new(catalogs, profile, initial_xp, seed)?;
        Ok(Self::new(controller))
    }

    /// Read-only catalogs, available without taking the session lock
    pub fn catalogs(&self) -> &Arc<Catalogs> {
        &self.catalogs
    }

    /// Subscribe to session snapshots
    pub fn subscribe(&self) -> broadcast::Receiver<SessionSnapshot> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.controller.snapshot()
    }

    /// Copy of the raw session record
    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.controller.state().clone()
    }

    /// Whether a tick task is currently attached to the session
    pub async fn is_ticking(&self) -> bool {
        self.inner.lock().await.ticker.is_some()
    }

    pub fn rank_for(&self, xp: u64) -> Result<RankProgress, LobbyError> {
        self.catalogs.ranks().rank_for(xp)
    }

    pub async fn select_vehicle(&self, id: &str) -> Result<SessionSnapshot, LobbyError> {
        let mut inner = self.inner.lock().await;
        match inner.controller.select_vehicle(id) {
            Ok(vehicle) => info!("Vehicle selected: {}", vehicle),
            Err(e) => {
                warn!("Rejected vehicle selection: {}", e);
                return Err(e);
            }
        }
        Ok(inner.publish(&self.events))
    }

    pub async fn select_location(&self, id: &str) -> Result<SessionSnapshot, LobbyError> {
        let mut inner = self.inner.lock().await;
        match inner.controller.select_location(id) {
            Ok(location) => info!("Location selected: {}", location),
            Err(e) => {
                warn!("Rejected location selection: {}", e);
                return Err(e);
            }
        }
        Ok(inner.publish(&self.events))
    }

    /// Start a session and attach its tick task
    pub async fn start_session(&self) -> Result<SessionSnapshot, LobbyError> {
        let mut inner = self.inner.lock().await;

        let session_id = inner.controller.start_session().map_err(|e| {
            warn!("Session start rejected: {}", e);
            e
        })?;

        let profile = *inner.controller.profile();
        inner.ticker = Some(TickerGuard::spawn(
            session_id,
            Arc::downgrade(&self.inner),
            self.events.clone(),
            profile,
        ));

        let snapshot = inner.publish(&self.events);
        info!(
            "Session {} started (vehicle {:?}, location {}, xp {})",
            session_id, snapshot.vehicle, snapshot.location, snapshot.xp
        );
        if let Some(e) = &snapshot.rank_error {
            warn!("No rank for session {}: {}", session_id, e);
        }
        Ok(snapshot)
    }

    /// Return to the lobby
    ///
    /// The tick task is cancelled while the lock is held, so no tick can
    /// land once this returns.
    pub async fn end_session(&self) -> SessionSnapshot {
        let mut inner = self.inner.lock().await;

        let session_id = inner.controller.state().session_id;
        let was_running = inner.controller.state().running;
        drop(inner.ticker.take());
        inner.controller.end_session();

        if was_running {
            info!("Session {} ended", session_id);
        }
        inner.publish(&self.events)
    }

    pub async fn toggle_sound(&self) -> SessionSnapshot {
        let mut inner = self.inner.lock().await;
        let enabled = inner.controller.toggle_sound();
        info!("Sound {}", if enabled { "enabled" } else { "disabled" });
        inner.publish(&self.events)
    }
}
