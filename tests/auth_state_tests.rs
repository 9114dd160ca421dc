// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth manager and the session listener that drives the other managers.

use mls_fixtures::db::ProfileStore;
use mls_fixtures::error::AppError;
use mls_fixtures::models::Favorite;
use mls_fixtures::services::AuthProvider;
use mls_fixtures::state::NewProfile;
use mls_fixtures::validation::SignUpForm;
use std::time::Duration;

mod common;
use common::{create_test_app, game, wait_until};

fn sign_up_form(email: &str, password: &str, confirm: &str, name: &str) -> SignUpForm {
    SignUpForm {
        email: email.to_string(),
        password: password.to_string(),
        confirm_password: confirm.to_string(),
        display_name: name.to_string(),
    }
}

/// Let spawned tasks run on the test runtime.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_sign_in_validation_makes_no_remote_call() {
    let app = create_test_app(vec![]);

    let err = app.ctx.auth.sign_in("", "whatever").await.unwrap_err();

    assert!(matches!(
        err,
        AppError::BadRequest(ref msg) if msg == "Please enter your email and password"
    ));
    let state = app.ctx.auth.snapshot();
    assert_eq!(
        state.error.as_deref(),
        Some("Please enter your email and password")
    );
    assert!(!state.loading);
    assert!(app.auth.current_user().is_none());
}

#[tokio::test]
async fn test_sign_up_password_mismatch_rejected_locally() {
    let app = create_test_app(vec![]);

    let form = sign_up_form("ana@example.com", "secret1", "secret2", "Ana");
    let err = app.ctx.auth.sign_up(form).await.unwrap_err();

    assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "Passwords do not match"));
    assert!(app.auth.sign_in("ana@example.com", "secret1").await.is_err());
}

#[tokio::test]
async fn test_sign_in_bad_credentials_sets_error() {
    let app = create_test_app(vec![]);

    let result = app.ctx.auth.sign_in("ana@example.com", "secret1").await;

    assert!(result.is_err());
    let state = app.ctx.auth.snapshot();
    assert_eq!(state.error.as_deref(), Some("Invalid email or password"));
    assert!(!state.authenticated);

    app.ctx.auth.clear_error();
    assert!(app.ctx.auth.snapshot().error.is_none());
}

#[tokio::test]
async fn test_sign_up_then_listener_authenticates() {
    let app = create_test_app(vec![]);
    let subscription = app.ctx.start();
    let mut auth_rx = app.ctx.auth.subscribe();

    let form = sign_up_form("ana@example.com", "secret1", "secret1", "Ana");
    let user = app.ctx.auth.sign_up(form).await.unwrap();
    app.ctx
        .profile
        .create(
            &user.uid,
            NewProfile {
                display_name: user.display_name.clone(),
                email: user.email.clone(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    wait_until(&mut auth_rx, |s| s.authenticated).await;

    let state = app.ctx.auth.snapshot();
    assert_eq!(state.user.as_ref().map(|u| u.uid.as_str()), Some(user.uid.as_str()));
    assert_eq!(app.ctx.auth.require_user().unwrap(), user.uid);
    assert!(app.store.get_profile(&user.uid).await.unwrap().is_some());

    subscription.unsubscribe();
}

#[tokio::test]
async fn test_sign_in_loads_profile_and_favorites() {
    let app = create_test_app(vec![]);
    let user = app.auth.sign_up("ana@example.com", "secret1", "Ana").await.unwrap();
    app.auth.sign_out().await.unwrap();
    app.ctx
        .profile
        .create(
            &user.uid,
            NewProfile {
                email: user.email.clone(),
                favorite_team: Some("Columbus Crew".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    app.ctx.profile.reset();
    let favorite = Favorite::from_game(&game("1", "A vs B", "A", "B"), "2024-05-01T00:00:00Z");
    app.store.set_favorite(&user.uid, &favorite).await.unwrap();

    let _subscription = app.ctx.start();
    let mut profile_rx = app.ctx.profile.subscribe();
    let mut games_rx = app.ctx.games.subscribe();

    app.ctx.auth.sign_in(" ana@example.com ", "secret1").await.unwrap();

    wait_until(&mut profile_rx, |s| s.profile.is_some()).await;
    wait_until(&mut games_rx, |s| s.favorites.len() == 1).await;

    let profile = app.ctx.profile.snapshot().profile.unwrap();
    assert_eq!(profile.favorite_team, "Columbus Crew");
    assert!(app.ctx.games.is_favorite("1"));
}

#[tokio::test]
async fn test_listener_sees_existing_session() {
    let app = create_test_app(vec![]);
    app.auth.sign_up("ana@example.com", "secret1", "Ana").await.unwrap();

    let _subscription = app.ctx.start();
    let mut auth_rx = app.ctx.auth.subscribe();

    wait_until(&mut auth_rx, |s| s.authenticated).await;
}

#[tokio::test]
async fn test_sign_out_clears_session_state() {
    let app = create_test_app(vec![]);
    let _subscription = app.ctx.start();
    let mut auth_rx = app.ctx.auth.subscribe();
    let mut games_rx = app.ctx.games.subscribe();

    let form = sign_up_form("ana@example.com", "secret1", "secret1", "Ana");
    let user = app.ctx.auth.sign_up(form).await.unwrap();
    wait_until(&mut auth_rx, |s| s.authenticated).await;
    app.ctx
        .games
        .toggle_favorite(&user.uid, &game("1", "A vs B", "A", "B"), false)
        .await
        .unwrap();

    app.ctx.auth.sign_out().await.unwrap();

    wait_until(&mut auth_rx, |s| !s.authenticated).await;
    wait_until(&mut games_rx, |s| s.favorites.is_empty()).await;
    assert!(app.ctx.auth.snapshot().user.is_none());
    assert!(app.ctx.profile.snapshot().profile.is_none());
    assert!(matches!(app.ctx.auth.require_user(), Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn test_dropped_subscription_stops_updates() {
    let app = create_test_app(vec![]);
    app.auth.sign_up("ana@example.com", "secret1", "Ana").await.unwrap();
    app.auth.sign_out().await.unwrap();

    let subscription = app.ctx.start();
    settle().await;
    drop(subscription);

    app.ctx.auth.sign_in("ana@example.com", "secret1").await.unwrap();
    settle().await;

    assert!(app.auth.current_user().is_some());
    assert!(!app.ctx.auth.snapshot().authenticated);
}

#[tokio::test]
async fn test_shutdown_discards_late_results() {
    let app = create_test_app(vec![game("1", "A vs B", "A", "B")]);
    let subscription = app.ctx.start();

    app.ctx.shutdown(subscription);
    assert!(!app.ctx.is_live());

    app.ctx.games.load_upcoming().await.unwrap();
    app.ctx.auth.sign_in("", "").await.unwrap_err();

    assert!(app.ctx.games.snapshot().games.is_empty());
    assert!(app.ctx.auth.snapshot().error.is_none());
}

#[tokio::test]
async fn test_token_refresh_refetches_profile() {
    let app = create_test_app(vec![]);
    let _subscription = app.ctx.start();
    let mut profile_rx = app.ctx.profile.subscribe();

    let user = app.auth.sign_up("ana@example.com", "secret1", "Ana").await.unwrap();
    app.ctx
        .profile
        .create(
            &user.uid,
            NewProfile {
                email: user.email.clone(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    wait_until(&mut profile_rx, |s| s.profile.is_some()).await;

    // Changed from another device; picked up on the next session event.
    let patch = mls_fixtures::models::ProfilePatch {
        favorite_team: Some("Real Salt Lake".to_string()),
        ..Default::default()
    };
    app.store.merge_profile(&user.uid, &patch).await.unwrap();

    app.auth.refresh_session();

    wait_until(&mut profile_rx, |s| {
        s.profile
            .as_ref()
            .is_some_and(|p| p.favorite_team == "Real Salt Lake")
    })
    .await;
    assert!(app.ctx.auth.snapshot().authenticated);
}
