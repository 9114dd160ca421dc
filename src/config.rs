// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;

/// Default TheSportsDB API root.
pub const DEFAULT_SPORTSDB_BASE_URL: &str = "https://www.thesportsdb.com/api/v1/json";
/// Free public TheSportsDB key.
pub const DEFAULT_SPORTSDB_API_KEY: &str = "3";
/// Major League Soccer league ID on TheSportsDB.
pub const DEFAULT_LEAGUE_ID: &str = "4346";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// TheSportsDB API root (no trailing slash)
    pub sportsdb_base_url: String,
    /// TheSportsDB API key path segment
    pub sportsdb_api_key: String,
    /// League whose fixtures are listed
    pub league_id: String,
    /// GCP / Firebase project ID
    pub gcp_project_id: String,
    /// Firebase Web API key (Identity Toolkit)
    pub firebase_api_key: String,
    /// Firebase Storage bucket for profile images
    pub storage_bucket: String,
}

impl Config {
    /// Config for testing only.
    pub fn test_default() -> Self {
        Self {
            sportsdb_base_url: DEFAULT_SPORTSDB_BASE_URL.to_string(),
            sportsdb_api_key: DEFAULT_SPORTSDB_API_KEY.to_string(),
            league_id: DEFAULT_LEAGUE_ID.to_string(),
            gcp_project_id: "test-project".to_string(),
            firebase_api_key: "test_api_key".to_string(),
            storage_bucket: "test-project.appspot.com".to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let gcp_project_id =
            env::var("GCP_PROJECT_ID").map_err(|_| ConfigError::Missing("GCP_PROJECT_ID"))?;

        let storage_bucket = env::var("FIREBASE_STORAGE_BUCKET")
            .unwrap_or_else(|_| format!("{}.appspot.com", gcp_project_id));

        Ok(Self {
            sportsdb_base_url: env::var("SPORTSDB_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_SPORTSDB_BASE_URL.to_string()),
            sportsdb_api_key: env::var("SPORTSDB_API_KEY")
                .unwrap_or_else(|_| DEFAULT_SPORTSDB_API_KEY.to_string()),
            league_id: env::var("SPORTSDB_LEAGUE_ID")
                .unwrap_or_else(|_| DEFAULT_LEAGUE_ID.to_string()),
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            gcp_project_id,
            storage_bucket,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
