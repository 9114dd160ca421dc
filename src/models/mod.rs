// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod favorite;
pub mod game;
pub mod profile;
pub mod session;

pub use favorite::Favorite;
pub use game::{Game, Team};
pub use profile::{Profile, ProfileImage, ProfilePatch};
pub use session::{AuthSession, SessionUser};

use serde::{Deserialize, Deserializer};

/// Deserialize a nullable string field as an empty string.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
