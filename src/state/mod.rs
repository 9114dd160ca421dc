// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side state layer.
//!
//! Three independently injectable managers own their slice of state and
//! publish every change on a `watch` channel. [`AppContext`] composes them
//! and runs the single session listener that ties them together.

pub mod auth;
pub mod games;
pub mod profile;

pub use auth::{AuthManager, AuthState, SessionSubscription};
pub use games::{filter_games, GamesManager, GamesState};
pub use profile::{NewProfile, ProfileManager, ProfileState};

use crate::config::Config;
use crate::db::{FirestoreDb, ProfileStore};
use crate::error::Result;
use crate::models::AuthSession;
use crate::services::{
    AuthProvider, FirebaseAuth, FirebaseStorage, GameSource, ObjectStore, SportsDbClient,
};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared flag telling managers whether results may still be applied.
#[derive(Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Liveness {
    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn shut_down(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Per-key async mutexes, created on first use.
#[derive(Clone, Default)]
pub(crate) struct KeyLocks(Arc<DashMap<String, Arc<Mutex<()>>>>);

impl KeyLocks {
    pub(crate) fn get(&self, key: String) -> Arc<Mutex<()>> {
        self.0
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Root context handed to the view layer.
#[derive(Clone)]
pub struct AppContext {
    pub games: GamesManager,
    pub profile: ProfileManager,
    pub auth: AuthManager,
    liveness: Liveness,
}

impl AppContext {
    /// Compose the managers over the given collaborators.
    pub fn new(
        source: Arc<dyn GameSource>,
        store: Arc<dyn ProfileStore>,
        objects: Arc<dyn ObjectStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        let liveness = Liveness::default();
        Self {
            games: GamesManager::new(source, store.clone(), liveness.clone()),
            profile: ProfileManager::new(store, objects, auth.clone(), liveness.clone()),
            auth: AuthManager::new(auth, liveness.clone()),
            liveness,
        }
    }

    /// Connect to TheSportsDB, Firestore, Firebase Storage, and Firebase Auth.
    pub async fn connect(config: &Config) -> Result<Self> {
        let store = FirestoreDb::new(&config.gcp_project_id).await?;
        let auth: Arc<dyn AuthProvider> = Arc::new(FirebaseAuth::new(&config.firebase_api_key));
        let objects = FirebaseStorage::new(&config.storage_bucket, auth.clone());

        Ok(Self::new(
            Arc::new(SportsDbClient::from_config(config)),
            Arc::new(store),
            Arc::new(objects),
            auth,
        ))
    }

    /// Install the session listener.
    ///
    /// The listener sees the current session immediately, then every change.
    /// On sign-in it loads the profile and favorites; on sign-out it clears
    /// them.
    pub fn start(&self) -> SessionSubscription {
        let mut sessions = self.auth.provider_sessions();
        let ctx = self.clone();

        let handle = tokio::spawn(async move {
            loop {
                let session = sessions.borrow_and_update().clone();
                ctx.on_session_change(session).await;

                if sessions.changed().await.is_err() {
                    tracing::debug!("Auth provider closed the session channel");
                    break;
                }
            }
        });

        tracing::info!("Session listener installed");
        SessionSubscription::new(handle)
    }

    async fn on_session_change(&self, session: AuthSession) {
        if !self.liveness.is_live() {
            return;
        }

        self.auth.apply_session(&session);

        match session {
            Some(user) => {
                // Failures are already recorded in each manager's state.
                let (profile, favorites) = tokio::join!(
                    self.profile.fetch(&user.uid),
                    self.games.load_favorites(&user.uid),
                );
                if profile.is_err() || favorites.is_err() {
                    tracing::warn!(uid = %user.uid, "Session start loads incomplete");
                }
            }
            None => {
                self.profile.reset();
                self.games.reset_favorites();
            }
        }
    }

    pub fn is_live(&self) -> bool {
        self.liveness.is_live()
    }

    /// Stop applying results and release the session listener.
    pub fn shutdown(&self, subscription: SessionSubscription) {
        self.liveness.shut_down();
        subscription.unsubscribe();
        tracing::info!("Context shut down");
    }
}
