// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore) and the profile store seam.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::models::{Favorite, Profile, ProfilePatch};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Sub-collection of `users/{uid}` keyed by game ID
    pub const FAVORITES: &str = "favorites";
}

/// Object store path of a user's profile image.
pub fn profile_image_path(uid: &str) -> String {
    format!("profile_images/{}", uid)
}

/// Remote document store holding profiles and favorites.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Read `users/{uid}`; `None` when the document does not exist.
    async fn get_profile(&self, uid: &str) -> Result<Option<Profile>>;

    /// Write a complete profile, replacing any existing document.
    async fn create_profile(&self, profile: &Profile) -> Result<()>;

    /// Merge-write the fields present in `patch`.
    async fn merge_profile(&self, uid: &str, patch: &ProfilePatch) -> Result<()>;

    /// Delete the profile document and its favorites.
    async fn delete_profile(&self, uid: &str) -> Result<()>;

    async fn set_favorite(&self, uid: &str, favorite: &Favorite) -> Result<()>;

    async fn delete_favorite(&self, uid: &str, game_id: &str) -> Result<()>;

    async fn list_favorites(&self, uid: &str) -> Result<Vec<Favorite>>;
}
