// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use mls_fixtures::db::{FirestoreDb, MemoryStore};
use mls_fixtures::models::Game;
use mls_fixtures::services::{MemoryAuth, MemoryGameSource};
use mls_fixtures::AppContext;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Generate a unique ID for test isolation.
#[allow(dead_code)]
pub fn unique_id(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Build a fixture with the given text fields.
#[allow(dead_code)]
pub fn game(id: &str, event: &str, home: &str, away: &str) -> Game {
    serde_json::from_value(serde_json::json!({
        "idEvent": id,
        "strEvent": event,
        "strHomeTeam": home,
        "strAwayTeam": away,
        "strLeague": "MLS",
        "dateEvent": "2024-05-01",
        "strTime": "19:30:00",
    }))
    .unwrap()
}

/// Context wired to in-memory collaborators, with handles to each fake.
#[allow(dead_code)]
pub struct TestApp {
    pub ctx: AppContext,
    pub source: Arc<MemoryGameSource>,
    pub store: Arc<MemoryStore>,
    pub auth: Arc<MemoryAuth>,
}

#[allow(dead_code)]
pub fn create_test_app(games: Vec<Game>) -> TestApp {
    let source = Arc::new(MemoryGameSource::new(games));
    let store = Arc::new(MemoryStore::new());
    let auth = Arc::new(MemoryAuth::new());

    let ctx = AppContext::new(source.clone(), store.clone(), store.clone(), auth.clone());

    TestApp {
        ctx,
        source,
        store,
        auth,
    }
}

/// Wait until a manager's state satisfies `pred`, failing after two seconds.
#[allow(dead_code)]
pub async fn wait_until<T, F>(rx: &mut watch::Receiver<T>, pred: F)
where
    F: FnMut(&T) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(pred))
        .await
        .expect("Timed out waiting for state change")
        .expect("State channel closed");
}

/// Serve `router` on an ephemeral local port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_mock_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}
