// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorite model stored under `users/{uid}/favorites/{gameId}`.

use super::Game;
use serde::{Deserialize, Serialize};

/// Reduced projection of a [`Game`] saved by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    #[serde(rename = "idEvent")]
    pub game_id: String,
    #[serde(rename = "strEvent", default)]
    pub event: String,
    #[serde(rename = "strHomeTeam", default)]
    pub home_team: String,
    #[serde(rename = "strAwayTeam", default)]
    pub away_team: String,
    #[serde(rename = "strLeague", default)]
    pub league: String,
    #[serde(rename = "dateEvent", default)]
    pub date: String,
    #[serde(rename = "strTime", default)]
    pub time: Option<String>,
    #[serde(rename = "strThumb", default)]
    pub thumbnail: Option<String>,
    /// When the favorite was captured (RFC 3339)
    #[serde(default)]
    pub timestamp: String,
}

impl Favorite {
    /// Project a game into a favorite record captured at `now`.
    pub fn from_game(game: &Game, now: &str) -> Self {
        Self {
            game_id: game.id.clone(),
            event: game.event.clone(),
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            league: game.league.clone(),
            date: game.date.clone(),
            time: game.time.clone(),
            thumbnail: game.thumbnail.clone(),
            timestamp: now.to_string(),
        }
    }
}
