// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - clients for the external collaborators.

pub mod firebase_auth;
pub mod memory;
pub mod sportsdb;
pub mod storage;

pub use firebase_auth::FirebaseAuth;
pub use memory::{MemoryAuth, MemoryGameSource};
pub use sportsdb::SportsDbClient;
pub use storage::{FirebaseStorage, ObjectStore};

use crate::error::Result;
use crate::models::{AuthSession, Game, SessionUser, Team};
use async_trait::async_trait;
use tokio::sync::watch;

/// Read-only source of fixtures and teams.
#[async_trait]
pub trait GameSource: Send + Sync {
    /// Upcoming fixtures for the configured league.
    async fn upcoming_games(&self) -> Result<Vec<Game>>;

    /// Single event lookup; `None` if the source has no such event.
    async fn game_details(&self, event_id: &str) -> Result<Option<Game>>;

    async fn team_details(&self, team_id: &str) -> Result<Option<Team>>;

    async fn search_teams(&self, name: &str) -> Result<Vec<Team>>;
}

/// External identity service.
///
/// Sign-in, sign-up, sign-out, token refresh and account deletion publish
/// the new session on the channel returned by [`AuthProvider::subscribe`].
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser>;

    async fn sign_up(&self, email: &str, password: &str, display_name: &str)
        -> Result<SessionUser>;

    async fn sign_out(&self) -> Result<()>;

    /// Push display name and photo URL to the signed-in account.
    async fn update_account(&self, display_name: Option<&str>, photo_url: &str) -> Result<()>;

    /// Delete the signed-in account.
    async fn delete_account(&self) -> Result<()>;

    fn current_user(&self) -> Option<SessionUser>;

    fn subscribe(&self) -> watch::Receiver<AuthSession>;

    /// A valid ID token for the signed-in user.
    async fn id_token(&self) -> Result<String>;
}
