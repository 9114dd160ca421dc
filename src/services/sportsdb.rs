// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TheSportsDB API client for fixtures and teams.
//!
//! Handles:
//! - Upcoming fixtures for one league
//! - Single event lookup (venue and description included)
//! - Team lookup and team search by name
//!
//! Every endpoint wraps its results in an `events` or `teams` array. A
//! response without that array is a failure, never an empty success.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Game, Team};
use crate::services::GameSource;
use async_trait::async_trait;
use serde::Deserialize;

/// TheSportsDB API client.
#[derive(Clone)]
pub struct SportsDbClient {
    http: reqwest::Client,
    base_url: String,
    league_id: String,
}

impl SportsDbClient {
    /// Create a client rooted at `{base_url}/{api_key}`.
    pub fn new(base_url: &str, api_key: &str, league_id: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}/{}", base_url.trim_end_matches('/'), api_key),
            league_id: league_id.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.sportsdb_base_url,
            &config.sportsdb_api_key,
            &config.league_id,
        )
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::GamesApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("TheSportsDB rate limit hit (429)");
            }

            return Err(AppError::GamesApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GamesApi(format!("JSON parse error: {}", e)))
    }

    async fn events(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Vec<Game>, AppError> {
        let envelope: EventsEnvelope = self.get_json(endpoint, query).await?;
        envelope.events.ok_or_else(|| {
            tracing::error!(endpoint, "Response missing events data");
            AppError::GamesApi(AppError::MISSING_GAMES_DATA.to_string())
        })
    }

    async fn teams(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Vec<Team>, AppError> {
        let envelope: TeamsEnvelope = self.get_json(endpoint, query).await?;
        envelope.teams.ok_or_else(|| {
            tracing::error!(endpoint, "Response missing teams data");
            AppError::GamesApi("No team data available".to_string())
        })
    }
}

#[async_trait]
impl GameSource for SportsDbClient {
    async fn upcoming_games(&self) -> Result<Vec<Game>, AppError> {
        let games = self
            .events("eventsnextleague.php", &[("id", self.league_id.as_str())])
            .await?;
        tracing::debug!(league = %self.league_id, count = games.len(), "Fetched upcoming games");
        Ok(games)
    }

    async fn game_details(&self, event_id: &str) -> Result<Option<Game>, AppError> {
        let events = self.events("lookupevent.php", &[("id", event_id)]).await?;
        Ok(events.into_iter().next())
    }

    async fn team_details(&self, team_id: &str) -> Result<Option<Team>, AppError> {
        let teams = self.teams("lookupteam.php", &[("id", team_id)]).await?;
        Ok(teams.into_iter().next())
    }

    async fn search_teams(&self, name: &str) -> Result<Vec<Team>, AppError> {
        self.teams("searchteams.php", &[("t", name)]).await
    }
}

/// `{"events": [...]}`; `null` or missing means no data.
#[derive(Debug, Deserialize)]
struct EventsEnvelope {
    #[serde(default)]
    events: Option<Vec<Game>>,
}

/// `{"teams": [...]}`; `null` or missing means no data.
#[derive(Debug, Deserialize)]
struct TeamsEnvelope {
    #[serde(default)]
    teams: Option<Vec<Team>>,
}
