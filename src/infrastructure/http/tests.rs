//! Router tests against an in-memory database

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::auth::PLAYER_HEADER;
use super::create_routes;
use crate::application::ports::outbound::FixedRandomPort;
use crate::infrastructure::config::{AppConfig, GameSettings};
use crate::infrastructure::state::AppState;

/// A router whose floors are open ground inside the border walls
async fn app() -> Router {
    let config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        seed_catalog: true,
        server_port: 0,
        game: GameSettings::default(),
    };
    let state = AppState::with_random(config, Arc::new(FixedRandomPort::constant(99)))
        .await
        .expect("state");
    create_routes().with_state(Arc::new(state))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    player: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(player) = player {
        builder = builder.header(PLAYER_HEADER, player);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

async fn create_character(app: &Router, player: &str, class: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/characters",
        Some(player),
        Some(json!({ "name": "Hero", "class": class })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().expect("id").to_string()
}

#[tokio::test]
async fn test_character_routes_require_a_player() {
    let app = app().await;

    let (status, _) = send(&app, Method::GET, "/api/characters", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_fetch_character() {
    let app = app().await;
    let id = create_character(&app, "p1", "warrior").await;

    let (status, body) = send(&app, Method::GET, &format!("/api/characters/{id}"), Some("p1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["class"], "warrior");
    assert_eq!(body["current_floor"], 1);
    assert_eq!((body["position_x"].clone(), body["position_y"].clone()), (json!(5), json!(5)));

    let (status, list) = send(&app, Method::GET, "/api/characters", Some("p1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_other_players_cannot_see_a_character() {
    let app = app().await;
    let id = create_character(&app, "p1", "mage").await;

    let (status, _) = send(&app, Method::GET, &format!("/api/characters/{id}"), Some("p2"), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_input_is_a_bad_request() {
    let app = app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/characters",
        Some("p1"),
        Some(json!({ "name": "Vex", "class": "bard" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/api/characters/not-a-uuid", Some("p1"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalog_routes() {
    let app = app().await;

    let (status, monsters) = send(&app, Method::GET, "/api/dungeon/monsters", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(monsters[0]["name"], "Goblin");

    let (status, items) = send(&app, Method::GET, "/api/dungeon/items", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(items
        .as_array()
        .expect("items")
        .iter()
        .any(|item| item["name"] == "Health Potion"));
}

#[tokio::test]
async fn test_raw_floor_has_walled_border() {
    let app = app().await;

    let (status, floor) = send(&app, Method::GET, "/api/dungeon/floor/1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let map = floor["map"].as_array().expect("map");
    assert_eq!(map.len(), 15);
    assert_eq!(map[0].as_array().map(Vec::len), Some(20));
    assert_eq!(map[0][0]["type"], "wall");
    assert_eq!(map[5][5]["type"], "floor");

    let (status, _) = send(&app, Method::GET, "/api/dungeon/floor/99", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_move_records_exploration() {
    let app = app().await;
    let id = create_character(&app, "p1", "rogue").await;

    let (status, view) = send(&app, Method::GET, &format!("/api/characters/{id}/floor"), Some("p1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["floor_number"], 1);
    assert!(view["encounter"].is_null());

    let (status, moved) = send(
        &app,
        Method::POST,
        &format!("/api/characters/{id}/move"),
        Some("p1"),
        Some(json!({ "dx": 1, "dy": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["character"]["position_x"], 6);
    assert_eq!(moved["tile"]["type"], "floor");

    let (status, progress) = send(&app, Method::GET, &format!("/api/dungeon/progress/{id}"), Some("p1"), None).await;
    assert_eq!(status, StatusCode::OK);
    let tiles = progress[0]["explored_tiles"].as_array().expect("tiles");
    assert!(tiles.contains(&json!("6,5")));

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/characters/{id}/move"),
        Some("p1"),
        Some(json!({ "dx": 1, "dy": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_attack_without_encounter_is_rejected() {
    let app = app().await;
    let id = create_character(&app, "p1", "warrior").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/game/combat",
        Some("p1"),
        Some(json!({ "character_id": id, "action": "attack", "round": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/game/combat",
        Some("p1"),
        Some(json!({ "character_id": id, "action": "dance" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_flee_always_succeeds() {
    let app = app().await;
    let id = create_character(&app, "p1", "rogue").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/game/combat",
        Some("p1"),
        Some(json!({ "character_id": id, "action": "flee" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "fled": true }));
}

#[tokio::test]
async fn test_ability_rejection_is_not_an_error() {
    let app = app().await;
    let id = create_character(&app, "p1", "mage").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/game/special-ability",
        Some("p1"),
        Some(json!({ "character_id": id, "ability_type": "backstab" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/game/special-ability",
        Some("p1"),
        Some(json!({ "character_id": id, "ability_type": "heal" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_unknown_inventory_entry_is_not_found() {
    let app = app().await;
    let id = create_character(&app, "p1", "cleric").await;

    let (status, inventory) = send(&app, Method::GET, &format!("/api/characters/{id}/inventory"), Some("p1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inventory, json!([]));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/game/use-item",
        Some("p1"),
        Some(json!({ "character_id": id, "inventory_id": uuid::Uuid::new_v4().to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
