//! REST API and SSE routes

use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::{Stream, StreamExt as FuturesStreamExt};
use serde::{Deserialize, Serialize};
use sim_lobby_core::model::{
    LocationCatalogEntry, PilotStats, PlayerRosterEntry, RankTier, VehicleCatalogEntry,
};
use sim_lobby_core::{LobbyError, RankProgress, SessionSnapshot};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tower_http::cors::CorsLayer;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Catalogs
        .route("/api/catalog/vehicles", get(list_vehicles))
        .route("/api/catalog/locations", get(list_locations))
        .route("/api/catalog/ranks", get(list_ranks))
        .route("/api/rank", get(rank_lookup))
        // Roster and statistics
        .route("/api/roster", get(roster))
        .route("/api/stats", get(pilot_stats))
        // Session
        .route("/api/session", get(session_snapshot))
        .route("/api/session/stream", get(session_stream))
        .route("/api/session/vehicle", post(select_vehicle))
        .route("/api/session/location", post(select_location))
        .route("/api/session/start", post(start_session))
        .route("/api/session/end", post(end_session))
        .route("/api/session/sound", post(toggle_sound))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// === Errors ===

/// Error rendered as `{"error": "..."}` with a matching status
pub enum ApiError {
    Lobby(LobbyError),
    /// Query string or body that could not be decoded
    BadRequest(String),
}

impl From<LobbyError> for ApiError {
    fn from(e: LobbyError) -> Self {
        Self::Lobby(e)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Lobby(e) => {
                let status = match &e {
                    LobbyError::InvalidSelection { .. } => StatusCode::NOT_FOUND,
                    LobbyError::NoVehicleSelected | LobbyError::AlreadyRunning => {
                        StatusCode::CONFLICT
                    }
                    LobbyError::XpOutOfRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    LobbyError::InvalidCatalog(_)
                    | LobbyError::InvalidRankTable(_)
                    | LobbyError::InvalidProfile(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

// === Catalog Endpoints ===

async fn list_vehicles(State(state): State<AppState>) -> Json<Vec<VehicleCatalogEntry>> {
    Json(state.lobby.catalogs().vehicles().to_vec())
}

async fn list_locations(State(state): State<AppState>) -> Json<Vec<LocationCatalogEntry>> {
    Json(state.lobby.catalogs().locations().to_vec())
}

async fn list_ranks(State(state): State<AppState>) -> Json<Vec<RankTier>> {
    Json(state.lobby.catalogs().ranks().tiers().to_vec())
}

#[derive(Deserialize)]
struct RankQuery {
    xp: u64,
}

async fn rank_lookup(
    State(state): State<AppState>,
    query: Result<Query<RankQuery>, QueryRejection>,
) -> Result<Json<RankProgress>, ApiError> {
    let Query(query) = query?;
    Ok(Json(state.lobby.rank_for(query.xp)?))
}

// === Roster Endpoints ===

#[derive(Serialize)]
struct RosterResponse {
    feed: String,
    online: usize,
    players: Vec<PlayerRosterEntry>,
}

async fn roster(State(state): State<AppState>) -> Json<RosterResponse> {
    let feed = state.roster.read().await;
    Json(RosterResponse {
        feed: feed.name().to_string(),
        online: feed.online_count(),
        players: feed.entries(),
    })
}

async fn pilot_stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    let stats: &PilotStats = &state.stats;
    Json(serde_json::json!({
        "stats": stats,
        "achievements_progress": stats.achievements_progress(),
    }))
}

// === Session Endpoints ===

async fn session_snapshot(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.lobby.snapshot().await)
}

async fn session_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.lobby.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(snapshot) => match serde_json::to_string(&snapshot) {
                Ok(json) => Some(Ok(Event::default().data(json))),
                Err(e) => {
                    tracing::error!("Failed to serialize snapshot: {}", e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Broadcast stream error: {}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[derive(Deserialize)]
struct SelectRequest {
    id: String,
}

async fn select_vehicle(
    State(state): State<AppState>,
    request: Result<Json<SelectRequest>, JsonRejection>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let Json(request) = request?;
    Ok(Json(state.lobby.select_vehicle(&request.id).await?))
}

async fn select_location(
    State(state): State<AppState>,
    request: Result<Json<SelectRequest>, JsonRejection>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let Json(request) = request?;
    Ok(Json(state.lobby.select_location(&request.id).await?))
}

async fn start_session(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.lobby.start_session().await?))
}

async fn end_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.lobby.end_session().await)
}

async fn toggle_sound(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.lobby.toggle_sound().await)
}
