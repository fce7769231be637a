//! Integration tests for the sim-lobby-server HTTP API
//!
//! Uses tower::ServiceExt::oneshot to test routes directly without binding a port.

use axum::body::Body;
use http_body_util::BodyExt;
use hyper::Request;
use sim_lobby_core::model::PlayerRosterEntry;
use sim_lobby_core::roster::{RosterFeed, StaticRoster};
use sim_lobby_core::units::Kilometers;
use sim_lobby_server::{api::create_router, config::LobbyConfig, state::AppState};
use tower::ServiceExt;

/// Helper: build AppState with a fixed seed
fn new_state() -> AppState {
    let config = LobbyConfig {
        seed: Some(5),
        ..LobbyConfig::default()
    };
    AppState::from_config(&config).unwrap()
}

/// Helper: build a router with fresh AppState
fn app() -> axum::Router {
    create_router(new_state())
}

/// Helper: build a router with AppState returned for further manipulation
fn app_with_state() -> (axum::Router, AppState) {
    let state = new_state();
    let router = create_router(state.clone());
    (router, state)
}

/// Helper: collect response body into JSON
async fn body_json(body: Body) -> serde_json::Value {
    let collected = body.collect().await.unwrap();
    serde_json::from_slice(&collected.to_bytes()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, json: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

// ==================== Catalogs ====================

#[tokio::test]
async fn test_get_vehicles_returns_catalog_in_order() {
    let response = app().oneshot(get("/api/catalog/vehicles")).await.unwrap();
    assert_eq!(response.status(), 200);

    let parsed = body_json(response.into_body()).await;
    let ids: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["car", "plane", "helicopter", "ship"]);
    assert_eq!(parsed[0]["stats"]["speed"], 95);
}

#[tokio::test]
async fn test_get_locations_returns_catalog() {
    let response = app().oneshot(get("/api/catalog/locations")).await.unwrap();
    assert_eq!(response.status(), 200);

    let parsed = body_json(response.into_body()).await;
    let locations = parsed.as_array().unwrap();
    assert_eq!(locations.len(), 5);
    for location in locations {
        let difficulty = location["difficulty"].as_u64().unwrap();
        assert!((1..=5).contains(&difficulty));
        assert!(location["weather"].is_string());
    }
}

#[tokio::test]
async fn test_get_ranks_returns_contiguous_tiers() {
    let response = app().oneshot(get("/api/catalog/ranks")).await.unwrap();
    assert_eq!(response.status(), 200);

    let parsed = body_json(response.into_body()).await;
    let tiers = parsed.as_array().unwrap();
    assert_eq!(tiers[0]["min_xp"], 0);
    for pair in tiers.windows(2) {
        assert_eq!(
            pair[0]["max_xp"].as_u64().unwrap() + 1,
            pair[1]["min_xp"].as_u64().unwrap()
        );
    }
}

#[tokio::test]
async fn test_rank_lookup() {
    let response = app().oneshot(get("/api/rank?xp=4200")).await.unwrap();
    assert_eq!(response.status(), 200);

    let parsed = body_json(response.into_body()).await;
    assert_eq!(parsed["tier"]["level"], 3);
    let progress = parsed["progress_percent"].as_f64().unwrap();
    assert!((progress - 40.0).abs() < 0.05);
}

#[tokio::test]
async fn test_rank_lookup_rejects_negative_xp() {
    let response = app().oneshot(get("/api/rank?xp=-5")).await.unwrap();
    assert_eq!(response.status(), 400);

    let content_type = response.headers().get("content-type").unwrap();
    assert_eq!(content_type, "application/json");

    let parsed = body_json(response.into_body()).await;
    assert!(
        parsed["error"].as_str().unwrap().contains("query string"),
        "Unexpected error body: {}",
        parsed
    );
}

#[tokio::test]
async fn test_rank_lookup_missing_xp_returns_json_400() {
    let response = app().oneshot(get("/api/rank")).await.unwrap();
    assert_eq!(response.status(), 400);

    let parsed = body_json(response.into_body()).await;
    assert!(parsed["error"].is_string());
}

// ==================== Roster and stats ====================

#[tokio::test]
async fn test_get_roster_returns_static_players() {
    let response = app().oneshot(get("/api/roster")).await.unwrap();
    assert_eq!(response.status(), 200);

    let parsed = body_json(response.into_body()).await;
    assert_eq!(parsed["feed"], "Static");
    assert_eq!(parsed["online"], 4);
    assert_eq!(parsed["players"][0]["name"], "SpeedRacer_Pro");
}

#[tokio::test]
async fn test_roster_feed_can_be_replaced() {
    let (app, state) = app_with_state();

    let feed = StaticRoster::new(vec![PlayerRosterEntry {
        id: 7,
        name: "Solo".to_string(),
        vehicle: "Катер".to_string(),
        distance: Kilometers(1.0),
        rank: "Новичок".to_string(),
    }]);
    assert_eq!(feed.online_count(), 1);
    state.set_roster_feed(Box::new(feed)).await;

    let response = app.oneshot(get("/api/roster")).await.unwrap();
    let parsed = body_json(response.into_body()).await;
    assert_eq!(parsed["online"], 1);
    assert_eq!(parsed["players"][0]["name"], "Solo");
}

/// Feed that lists a few players but reports a larger online count
struct PagedRoster;

impl RosterFeed for PagedRoster {
    fn name(&self) -> &str {
        "Paged"
    }

    fn entries(&self) -> Vec<PlayerRosterEntry> {
        StaticRoster::default().entries().into_iter().take(2).collect()
    }

    fn online_count(&self) -> usize {
        128
    }
}

#[tokio::test]
async fn test_roster_online_count_comes_from_feed() {
    let (app, state) = app_with_state();
    state.set_roster_feed(Box::new(PagedRoster)).await;

    let response = app.oneshot(get("/api/roster")).await.unwrap();
    let parsed = body_json(response.into_body()).await;
    assert_eq!(parsed["feed"], "Paged");
    assert_eq!(parsed["online"], 128);
    assert_eq!(parsed["players"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_stats() {
    let response = app().oneshot(get("/api/stats")).await.unwrap();
    assert_eq!(response.status(), 200);

    let parsed = body_json(response.into_body()).await;
    assert_eq!(parsed["stats"]["achievements_unlocked"], 18);
    assert_eq!(parsed["stats"]["achievements_total"], 50);
    assert_eq!(parsed["achievements_progress"], 36.0);
}

// ==================== Session ====================

#[tokio::test]
async fn test_initial_session_snapshot() {
    let response = app().oneshot(get("/api/session")).await.unwrap();
    assert_eq!(response.status(), 200);

    let parsed = body_json(response.into_body()).await;
    assert_eq!(parsed["phase"], "lobby");
    assert_eq!(parsed["running"], false);
    assert!(parsed["vehicle"].is_null());
    assert_eq!(parsed["location"], "city");
    assert_eq!(parsed["readouts"]["fuel"], 100.0);
    assert_eq!(parsed["xp"], 4200);
    assert_eq!(parsed["rank"]["tier"]["level"], 3);
    assert!(parsed["rank_error"].is_null());
}

#[tokio::test]
async fn test_select_unknown_vehicle_returns_404() {
    let (app, state) = app_with_state();

    let response = app
        .clone()
        .oneshot(post_json("/api/session/vehicle", serde_json::json!({"id": "car"})))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = app
        .oneshot(post_json(
            "/api/session/vehicle",
            serde_json::json!({"id": "bogus-id"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let parsed = body_json(response.into_body()).await;
    assert!(parsed["error"].as_str().unwrap().contains("bogus-id"));

    let snapshot = state.lobby.snapshot().await;
    assert_eq!(snapshot.vehicle.map(|v| v.as_str()), Some("car"));
}

#[tokio::test]
async fn test_malformed_vehicle_body_returns_json_400() {
    let (app, state) = app_with_state();

    let response = app
        .oneshot(post_json("/api/session/vehicle", serde_json::json!({"nope": 1})))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let parsed = body_json(response.into_body()).await;
    assert!(
        parsed["error"].as_str().unwrap().contains("missing field `id`"),
        "Unexpected error body: {}",
        parsed
    );
    assert!(state.lobby.snapshot().await.vehicle.is_none());
}

#[tokio::test]
async fn test_location_body_without_json_content_type_returns_json_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/session/location")
        .body(Body::from(r#"{"id":"ocean"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), 400);

    let parsed = body_json(response.into_body()).await;
    assert!(parsed["error"].is_string());
}

#[tokio::test]
async fn test_select_location() {
    let app = app();

    let response = app
        .oneshot(post_json(
            "/api/session/location",
            serde_json::json!({"id": "mountains"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let parsed = body_json(response.into_body()).await;
    assert_eq!(parsed["location"], "mountains");
}

#[tokio::test]
async fn test_start_without_vehicle_returns_409() {
    let (app, state) = app_with_state();

    let response = app.oneshot(post("/api/session/start")).await.unwrap();
    assert_eq!(response.status(), 409);

    let parsed = body_json(response.into_body()).await;
    assert_eq!(parsed["error"], "no vehicle selected");
    assert!(!state.lobby.state().await.running);
}

#[tokio::test]
async fn test_start_and_end_session() {
    let (app, state) = app_with_state();

    app.clone()
        .oneshot(post_json("/api/session/vehicle", serde_json::json!({"id": "plane"})))
        .await
        .unwrap();

    let response = app.clone().oneshot(post("/api/session/start")).await.unwrap();
    assert_eq!(response.status(), 200);
    let parsed = body_json(response.into_body()).await;
    assert_eq!(parsed["phase"], "running");
    assert_eq!(parsed["xp"], 4250);
    assert_eq!(parsed["readouts"]["speed"], 0.0);
    assert!(state.lobby.is_ticking().await);

    // Second start while running conflicts
    let response = app.clone().oneshot(post("/api/session/start")).await.unwrap();
    assert_eq!(response.status(), 409);

    let response = app.oneshot(post("/api/session/end")).await.unwrap();
    assert_eq!(response.status(), 200);
    let parsed = body_json(response.into_body()).await;
    assert_eq!(parsed["phase"], "lobby");
    assert_eq!(parsed["readouts"]["fuel"], 100.0);
    assert!(!state.lobby.is_ticking().await);
}

#[tokio::test]
async fn test_toggle_sound() {
    let app = app();

    let response = app.clone().oneshot(post("/api/session/sound")).await.unwrap();
    let parsed = body_json(response.into_body()).await;
    assert_eq!(parsed["sound_enabled"], false);

    let response = app.oneshot(post("/api/session/sound")).await.unwrap();
    let parsed = body_json(response.into_body()).await;
    assert_eq!(parsed["sound_enabled"], true);
}

#[tokio::test]
async fn test_session_stream_returns_event_stream() {
    let response = app().oneshot(get("/api/session/stream")).await.unwrap();
    assert_eq!(response.status(), 200);

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(
        content_type.contains("text/event-stream"),
        "Expected text/event-stream content-type, got: {}",
        content_type
    );
}
