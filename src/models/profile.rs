// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile model for storage and the view layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User profile stored in Firestore at `users/{uid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Authentication user ID (also used as document ID)
    #[serde(default)]
    pub uid: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    /// Download URL of the profile image, empty when there is none
    #[serde(rename = "photoURL", default)]
    pub photo_url: String,
    #[serde(rename = "favoriteTeam", default)]
    pub favorite_team: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: String,
}

impl Profile {
    /// Record with every field empty, as a merge-write into a missing
    /// document leaves it.
    pub fn empty(uid: &str) -> Self {
        Self {
            uid: uid.to_string(),
            display_name: String::new(),
            email: String::new(),
            photo_url: String::new(),
            favorite_team: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// Apply a merge patch in memory, the same way the store applies it.
    pub fn merge(&mut self, patch: &ProfilePatch) {
        if let Some(v) = &patch.display_name {
            self.display_name = v.clone();
        }
        if let Some(v) = &patch.email {
            self.email = v.clone();
        }
        if let Some(v) = &patch.photo_url {
            self.photo_url = v.clone();
        }
        if let Some(v) = &patch.favorite_team {
            self.favorite_team = v.clone();
        }
        if let Some(v) = &patch.updated_at {
            self.updated_at = v.clone();
        }
    }
}

/// Merge-write payload. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(rename = "favoriteTeam", skip_serializing_if = "Option::is_none")]
    pub favorite_team: Option<String>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ProfilePatch {
    /// Document field paths present in this patch (the store's update mask).
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::new();
        if self.display_name.is_some() {
            paths.push("displayName");
        }
        if self.email.is_some() {
            paths.push("email");
        }
        if self.photo_url.is_some() {
            paths.push("photoURL");
        }
        if self.favorite_team.is_some() {
            paths.push("favoriteTeam");
        }
        if self.updated_at.is_some() {
            paths.push("updatedAt");
        }
        paths
    }
}

/// Image supplied with a profile update.
#[derive(Debug, Clone)]
pub enum ProfileImage {
    /// Local file, read when the update runs
    Path(PathBuf),
    /// Raw bytes already in memory
    Bytes { data: Vec<u8>, content_type: String },
}

impl ProfileImage {
    /// Resolve the handle into bytes and a content type.
    pub async fn load(&self) -> std::io::Result<(Vec<u8>, String)> {
        match self {
            ProfileImage::Path(path) => {
                let data = tokio::fs::read(path).await?;
                let content_type = match path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_ascii_lowercase())
                    .as_deref()
                {
                    Some("png") => "image/png",
                    Some("gif") => "image/gif",
                    Some("webp") => "image/webp",
                    _ => "image/jpeg",
                };
                Ok((data, content_type.to_string()))
            }
            ProfileImage::Bytes { data, content_type } => Ok((data.clone(), content_type.clone())),
        }
    }
}
