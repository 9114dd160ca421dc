// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory game source and auth provider for offline use and tests.

use crate::error::{AppError, Result};
use crate::models::{AuthSession, Game, SessionUser, Team};
use crate::services::{AuthProvider, GameSource};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{watch, RwLock};

/// Game source serving a fixed list of fixtures.
#[derive(Default)]
pub struct MemoryGameSource {
    games: RwLock<Vec<Game>>,
    teams: RwLock<Vec<Team>>,
    failing: AtomicBool,
}

impl MemoryGameSource {
    pub fn new(games: Vec<Game>) -> Self {
        Self {
            games: RwLock::new(games),
            ..Default::default()
        }
    }

    pub async fn set_games(&self, games: Vec<Game>) {
        *self.games.write().await = games;
    }

    pub async fn set_teams(&self, teams: Vec<Team>) {
        *self.teams.write().await = teams;
    }

    /// Make every request fail until switched off.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::GamesApi("HTTP 503 Service Unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl GameSource for MemoryGameSource {
    async fn upcoming_games(&self) -> Result<Vec<Game>> {
        self.check()?;
        Ok(self.games.read().await.clone())
    }

    async fn game_details(&self, event_id: &str) -> Result<Option<Game>> {
        self.check()?;
        Ok(self
            .games
            .read()
            .await
            .iter()
            .find(|g| g.id == event_id)
            .cloned())
    }

    async fn team_details(&self, team_id: &str) -> Result<Option<Team>> {
        self.check()?;
        Ok(self
            .teams
            .read()
            .await
            .iter()
            .find(|t| t.id == team_id)
            .cloned())
    }

    async fn search_teams(&self, name: &str) -> Result<Vec<Team>> {
        self.check()?;
        let needle = name.to_lowercase();
        Ok(self
            .teams
            .read()
            .await
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

struct Account {
    password: String,
    user: SessionUser,
}

/// Auth provider keeping accounts in memory, keyed by email.
pub struct MemoryAuth {
    accounts: DashMap<String, Account>,
    next_uid: AtomicU64,
    session: watch::Sender<AuthSession>,
}

impl Default for MemoryAuth {
    fn default() -> Self {
        let (session, _) = watch::channel(None);
        Self {
            accounts: DashMap::new(),
            next_uid: AtomicU64::new(1),
            session,
        }
    }
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a token-refresh style notification for the current session.
    pub fn refresh_session(&self) {
        self.session.send_modify(|_| {});
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser> {
        let user = match self.accounts.get(email) {
            Some(account) if account.password == password => account.user.clone(),
            _ => return Err(AppError::Auth("Invalid email or password".to_string())),
        };
        self.session.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SessionUser> {
        let uid = format!("user-{}", self.next_uid.fetch_add(1, Ordering::SeqCst));
        let user = SessionUser {
            uid,
            email: email.to_string(),
            display_name: Some(display_name.to_string()),
            photo_url: String::new(),
        };

        match self.accounts.entry(email.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(AppError::Auth(
                    "An account already exists for this email".to_string(),
                ))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Account {
                    password: password.to_string(),
                    user: user.clone(),
                });
            }
        }

        self.session.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        self.session.send_replace(None);
        Ok(())
    }

    async fn update_account(&self, display_name: Option<&str>, photo_url: &str) -> Result<()> {
        let current = self.current_user().ok_or(AppError::Unauthorized)?;

        let apply = |user: &mut SessionUser| {
            if let Some(name) = display_name {
                user.display_name = Some(name.to_string());
            }
            user.photo_url = photo_url.to_string();
        };

        if let Some(mut account) = self.accounts.get_mut(&current.email) {
            apply(&mut account.user);
        }
        self.session.send_if_modified(|session| {
            if let Some(user) = session.as_mut() {
                apply(user);
            }
            false
        });
        Ok(())
    }

    async fn delete_account(&self) -> Result<()> {
        let current = self.current_user().ok_or(AppError::Unauthorized)?;
        self.accounts.remove(&current.email);
        self.session.send_replace(None);
        Ok(())
    }

    fn current_user(&self) -> Option<SessionUser> {
        self.session.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<AuthSession> {
        self.session.subscribe()
    }

    async fn id_token(&self) -> Result<String> {
        self.current_user()
            .map(|u| format!("memory-token-{}", u.uid))
            .ok_or(AppError::Unauthorized)
    }
}
