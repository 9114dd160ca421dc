// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent user-facing messages.

/// Application error type shared by the backends and state managers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Games API error: {0}")]
    GamesApi(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message returned by the games API layer when the response lacks its data array.
    pub const MISSING_GAMES_DATA: &'static str = "No games data available";

    /// One-shot message suitable for presenting to the user.
    ///
    /// Transport and missing-data failures collapse into the same generic
    /// text; validation messages pass through verbatim.
    pub fn user_message(&self, what: &str) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Auth(msg) => msg.clone(),
            AppError::Unauthorized => "Please sign in first".to_string(),
            _ => format!("Failed to {}", what),
        }
    }

    /// Whether this error came from an object that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;
