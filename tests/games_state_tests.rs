// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Games state manager: loading, search, and favorites.

use mls_fixtures::db::ProfileStore;
use mls_fixtures::error::AppError;

mod common;
use common::{create_test_app, game};

#[tokio::test]
async fn test_load_upcoming_then_search() {
    let app = create_test_app(vec![game("1", "A vs B", "A", "B")]);
    let games = &app.ctx.games;

    games.load_upcoming().await.unwrap();

    let state = games.snapshot();
    assert_eq!(state.games.len(), 1);
    assert_eq!(state.filtered.len(), 1);
    assert_eq!(state.filtered[0].id, "1");
    assert!(!state.loading);
    assert!(state.error.is_none());

    games.set_search_term("a");
    let state = games.snapshot();
    assert_eq!(state.search_term, "a");
    assert_eq!(state.filtered.len(), 1);

    games.set_search_term("zzz");
    assert!(games.snapshot().filtered.is_empty());

    games.clear_search_term();
    let state = games.snapshot();
    assert_eq!(state.search_term, "");
    assert_eq!(state.filtered, state.games);
}

#[tokio::test]
async fn test_load_recomputes_filter_for_existing_term() {
    let app = create_test_app(vec![
        game("1", "LA Galaxy vs Inter Miami", "LA Galaxy", "Inter Miami"),
        game("2", "Austin FC vs FC Dallas", "Austin FC", "FC Dallas"),
    ]);
    let games = &app.ctx.games;

    games.set_search_term("Miami");
    games.load_upcoming().await.unwrap();

    let state = games.snapshot();
    assert_eq!(state.games.len(), 2);
    assert_eq!(state.filtered.len(), 1);
    assert_eq!(state.filtered[0].id, "1");
}

#[tokio::test]
async fn test_load_failure_keeps_previous_games() {
    let app = create_test_app(vec![game("1", "A vs B", "A", "B")]);
    let games = &app.ctx.games;
    games.load_upcoming().await.unwrap();

    app.source.set_failing(true);
    let err = games.load_upcoming().await.unwrap_err();
    assert!(matches!(err, AppError::GamesApi(_)));

    let state = games.snapshot();
    assert_eq!(state.games.len(), 1);
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Failed to fetch games"));

    games.clear_error();
    assert!(games.snapshot().error.is_none());
}

#[tokio::test]
async fn test_toggle_favorite_on_and_off() {
    let app = create_test_app(vec![]);
    let games = &app.ctx.games;
    let fixture = game("1", "A vs B", "A", "B");

    assert!(games.snapshot().favorites.is_empty());

    games.toggle_favorite("u1", &fixture, false).await.unwrap();
    let favorites = games.snapshot().favorites;
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].game_id, "1");
    assert_eq!(favorites[0].event, "A vs B");
    assert!(!favorites[0].timestamp.is_empty());
    assert!(games.is_favorite("1"));
    assert_eq!(app.store.list_favorites("u1").await.unwrap().len(), 1);

    games.toggle_favorite("u1", &fixture, true).await.unwrap();
    assert!(games.snapshot().favorites.is_empty());
    assert!(!games.is_favorite("1"));
    assert!(app.store.list_favorites("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_toggle_without_user_is_rejected() {
    let app = create_test_app(vec![]);
    let fixture = game("1", "A vs B", "A", "B");

    let err = app
        .ctx
        .games
        .toggle_favorite("", &fixture, false)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Unauthorized));
    assert!(app.ctx.games.snapshot().favorites.is_empty());
    assert!(app.store.list_favorites("").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_toggle_failure_leaves_favorites_unchanged() {
    let app = create_test_app(vec![]);
    let games = &app.ctx.games;
    let first = game("1", "A vs B", "A", "B");
    let second = game("2", "C vs D", "C", "D");

    games.toggle_favorite("u1", &first, false).await.unwrap();

    app.store.set_fail_writes(true);
    assert!(games.toggle_favorite("u1", &second, false).await.is_err());
    assert!(games.toggle_favorite("u1", &first, true).await.is_err());

    let state = games.snapshot();
    assert_eq!(state.favorites.len(), 1);
    assert_eq!(state.favorites[0].game_id, "1");
    assert_eq!(state.error.as_deref(), Some("Failed to update favorites"));
}

#[tokio::test]
async fn test_concurrent_adds_do_not_duplicate() {
    let app = create_test_app(vec![]);
    let games = app.ctx.games.clone();
    let fixture = game("7", "E vs F", "E", "F");

    let (a, b) = tokio::join!(
        games.toggle_favorite("u1", &fixture, false),
        games.toggle_favorite("u1", &fixture, false),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(games.snapshot().favorites.len(), 1);
    assert_eq!(app.store.list_favorites("u1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_load_favorites_replaces_in_memory_list() {
    let app = create_test_app(vec![]);
    let games = &app.ctx.games;

    games
        .toggle_favorite("u1", &game("1", "A vs B", "A", "B"), false)
        .await
        .unwrap();
    // Written behind the manager's back, e.g. from another device.
    let other = mls_fixtures::models::Favorite::from_game(
        &game("2", "C vs D", "C", "D"),
        "2024-05-01T00:00:00Z",
    );
    app.store.set_favorite("u1", &other).await.unwrap();
    app.store.delete_favorite("u1", "1").await.unwrap();

    games.load_favorites("u1").await.unwrap();

    let favorites = games.snapshot().favorites;
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].game_id, "2");
}

#[tokio::test]
async fn test_game_details_does_not_touch_list() {
    let app = create_test_app(vec![game("1", "A vs B", "A", "B")]);
    let games = &app.ctx.games;

    let details = games.game_details("1").await.unwrap();
    assert_eq!(details.map(|g| g.id), Some("1".to_string()));
    assert!(games.game_details("404").await.unwrap().is_none());
    assert!(games.snapshot().games.is_empty());
}

#[tokio::test]
async fn test_search_teams() {
    let app = create_test_app(vec![]);
    let team: mls_fixtures::models::Team = serde_json::from_value(serde_json::json!({
        "idTeam": "134153",
        "strTeam": "LA Galaxy",
        "strStadium": "Dignity Health Sports Park",
    }))
    .unwrap();
    app.source.set_teams(vec![team]).await;

    let found = app.ctx.games.search_teams("galaxy").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "134153");

    let team = app.ctx.games.team_details("134153").await.unwrap().unwrap();
    assert_eq!(team.stadium.as_deref(), Some("Dignity Health Sports Park"));
}

#[tokio::test]
async fn test_reload_picks_up_new_fixtures() {
    let app = create_test_app(vec![game("1", "A vs B", "A", "B")]);
    let games = &app.ctx.games;
    games.load_upcoming().await.unwrap();

    app.source
        .set_games(vec![
            game("2", "C vs D", "C", "D"),
            game("3", "E vs F", "E", "F"),
        ])
        .await;
    games.load_upcoming().await.unwrap();

    let ids: Vec<String> = games.snapshot().games.into_iter().map(|g| g.id).collect();
    assert_eq!(ids, vec!["2", "3"]);
}
