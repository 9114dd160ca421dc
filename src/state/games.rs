// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Games state manager: upcoming fixtures, search, and favorites.

use crate::db::ProfileStore;
use crate::error::{AppError, Result};
use crate::models::{Favorite, Game, Team};
use crate::services::GameSource;
use crate::state::{KeyLocks, Liveness};
use crate::time_utils;
use std::sync::Arc;
use tokio::sync::watch;

/// Snapshot of everything the games views render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamesState {
    /// Upcoming fixtures as last fetched
    pub games: Vec<Game>,
    /// `games` narrowed by `search_term`
    pub filtered: Vec<Game>,
    /// Search term exactly as entered
    pub search_term: String,
    pub favorites: Vec<Favorite>,
    pub loading: bool,
    /// One-shot error; cleared by the view after display
    pub error: Option<String>,
}

/// Filter games by a search term.
///
/// A game matches when its event name, league, or either team name contains
/// the term, ignoring case. A blank term returns the list unchanged.
pub fn filter_games(games: &[Game], term: &str) -> Vec<Game> {
    if term.trim().is_empty() {
        return games.to_vec();
    }

    let needle = term.to_lowercase();
    games
        .iter()
        .filter(|game| game.matches_lowercase(&needle))
        .cloned()
        .collect()
}

/// Owns the game list, search state, and the in-memory favorites.
#[derive(Clone)]
pub struct GamesManager {
    source: Arc<dyn GameSource>,
    store: Arc<dyn ProfileStore>,
    state: Arc<watch::Sender<GamesState>>,
    /// Serializes favorite toggles per (user, game).
    toggle_locks: KeyLocks,
    liveness: Liveness,
}

impl GamesManager {
    pub fn new(
        source: Arc<dyn GameSource>,
        store: Arc<dyn ProfileStore>,
        liveness: Liveness,
    ) -> Self {
        let (state, _) = watch::channel(GamesState::default());
        Self {
            source,
            store,
            state: Arc::new(state),
            toggle_locks: KeyLocks::default(),
            liveness,
        }
    }

    /// Receive a notification after every state change.
    pub fn subscribe(&self) -> watch::Receiver<GamesState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> GamesState {
        self.state.borrow().clone()
    }

    /// Apply a mutation unless the owning context has shut down.
    fn apply(&self, f: impl FnOnce(&mut GamesState)) {
        if !self.liveness.is_live() {
            tracing::debug!("Context shut down, dropping games state update");
            return;
        }
        self.state.send_modify(f);
    }

    fn fail(&self, err: &AppError, what: &str) {
        let message = err.user_message(what);
        self.apply(|s| {
            s.loading = false;
            s.error = Some(message);
        });
    }

    // ─── Upcoming Games ──────────────────────────────────────────

    /// Fetch upcoming fixtures and recompute the filtered list.
    ///
    /// On failure the previous game list is kept.
    pub async fn load_upcoming(&self) -> Result<()> {
        self.apply(|s| {
            s.loading = true;
            s.error = None;
        });

        match self.source.upcoming_games().await {
            Ok(games) => {
                tracing::info!(count = games.len(), "Loaded upcoming games");
                self.apply(|s| {
                    s.loading = false;
                    s.filtered = filter_games(&games, &s.search_term);
                    s.games = games;
                });
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch upcoming games");
                self.fail(&e, "fetch games");
                Err(e)
            }
        }
    }

    /// Fetch the detailed record for one fixture.
    ///
    /// The result is returned to the caller only; the game list is untouched.
    pub async fn game_details(&self, event_id: &str) -> Result<Option<Game>> {
        self.source.game_details(event_id).await.inspect_err(|e| {
            tracing::error!(event_id, error = %e, "Failed to fetch game details");
            self.fail(e, "load game details");
        })
    }

    pub async fn team_details(&self, team_id: &str) -> Result<Option<Team>> {
        self.source.team_details(team_id).await.inspect_err(|e| {
            tracing::error!(team_id, error = %e, "Failed to fetch team details");
            self.fail(e, "fetch team details");
        })
    }

    pub async fn search_teams(&self, name: &str) -> Result<Vec<Team>> {
        self.source.search_teams(name).await.inspect_err(|e| {
            tracing::error!(name, error = %e, "Failed to search teams");
            self.fail(e, "search teams");
        })
    }

    // ─── Search ──────────────────────────────────────────────────

    /// Store the term verbatim and recompute the filtered list.
    pub fn set_search_term(&self, term: &str) {
        self.apply(|s| {
            s.search_term = term.to_string();
            s.filtered = filter_games(&s.games, term);
        });
    }

    pub fn clear_search_term(&self) {
        self.set_search_term("");
    }

    // ─── Favorites ───────────────────────────────────────────────

    pub fn is_favorite(&self, game_id: &str) -> bool {
        self.state
            .borrow()
            .favorites
            .iter()
            .any(|f| f.game_id == game_id)
    }

    /// Add or remove a favorite.
    ///
    /// The in-memory list changes only after the store write succeeds.
    /// Toggles for the same (user, game) run one at a time.
    pub async fn toggle_favorite(
        &self,
        user_id: &str,
        game: &Game,
        is_currently_favorite: bool,
    ) -> Result<()> {
        if user_id.is_empty() {
            tracing::warn!(game_id = %game.id, "Favorite toggle without a signed-in user");
            let err = AppError::Unauthorized;
            self.fail(&err, "update favorites");
            return Err(err);
        }

        let lock = self.toggle_locks.get(format!("{}/{}", user_id, game.id));
        let _guard = lock.lock().await;

        let result = if is_currently_favorite {
            self.store
                .delete_favorite(user_id, &game.id)
                .await
                .map(|()| None)
        } else {
            let favorite = Favorite::from_game(game, &time_utils::now_rfc3339());
            self.store
                .set_favorite(user_id, &favorite)
                .await
                .map(|()| Some(favorite))
        };

        match result {
            Ok(Some(favorite)) => {
                tracing::info!(user_id, game_id = %game.id, "Added favorite");
                self.apply(|s| {
                    s.favorites.retain(|f| f.game_id != favorite.game_id);
                    s.favorites.push(favorite);
                });
                Ok(())
            }
            Ok(None) => {
                tracing::info!(user_id, game_id = %game.id, "Removed favorite");
                self.apply(|s| s.favorites.retain(|f| f.game_id != game.id));
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    user_id,
                    game_id = %game.id,
                    error = %e,
                    "Failed to toggle favorite"
                );
                self.fail(&e, "update favorites");
                Err(e)
            }
        }
    }

    /// Replace the in-memory favorites with the stored ones.
    pub async fn load_favorites(&self, user_id: &str) -> Result<()> {
        self.apply(|s| s.loading = true);

        match self.store.list_favorites(user_id).await {
            Ok(favorites) => {
                tracing::debug!(user_id, count = favorites.len(), "Loaded favorites");
                self.apply(|s| {
                    s.loading = false;
                    s.favorites = favorites;
                });
                Ok(())
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to fetch favorites");
                self.fail(&e, "fetch favorites");
                Err(e)
            }
        }
    }

    /// Forget the in-memory favorites (on sign-out).
    pub fn reset_favorites(&self) {
        self.apply(|s| s.favorites.clear());
    }

    pub fn clear_error(&self) {
        self.apply(|s| s.error = None);
    }
}
