// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory profile and object store for offline use and tests.

use crate::db::ProfileStore;
use crate::error::{AppError, Result};
use crate::models::{Favorite, Profile, ProfilePatch};
use crate::services::storage::ObjectStore;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Document and object store kept entirely in memory.
///
/// Favorites are listed in game-ID order. Failure switches let tests
/// exercise the error paths of the state managers.
#[derive(Default)]
pub struct MemoryStore {
    profiles: DashMap<String, Profile>,
    favorites: DashMap<String, BTreeMap<String, Favorite>>,
    objects: DashMap<String, (Vec<u8>, String)>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_uploads: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every profile read fail until switched off.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every document write fail until switched off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every object upload fail until switched off.
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Whether an object exists at `path`.
    pub fn has_object(&self, path: &str) -> bool {
        self.objects.contains_key(path)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database("write rejected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<Profile>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Database("read rejected".to_string()));
        }
        Ok(self.profiles.get(uid).map(|p| p.clone()))
    }

    async fn create_profile(&self, profile: &Profile) -> Result<()> {
        self.check_writable()?;
        self.profiles.insert(profile.uid.clone(), profile.clone());
        Ok(())
    }

    async fn merge_profile(&self, uid: &str, patch: &ProfilePatch) -> Result<()> {
        self.check_writable()?;
        self.profiles
            .entry(uid.to_string())
            .or_insert_with(|| Profile::empty(uid))
            .merge(patch);
        Ok(())
    }

    async fn delete_profile(&self, uid: &str) -> Result<()> {
        self.check_writable()?;
        self.favorites.remove(uid);
        self.profiles.remove(uid);
        Ok(())
    }

    async fn set_favorite(&self, uid: &str, favorite: &Favorite) -> Result<()> {
        self.check_writable()?;
        self.favorites
            .entry(uid.to_string())
            .or_default()
            .insert(favorite.game_id.clone(), favorite.clone());
        Ok(())
    }

    async fn delete_favorite(&self, uid: &str, game_id: &str) -> Result<()> {
        self.check_writable()?;
        if let Some(mut favorites) = self.favorites.get_mut(uid) {
            favorites.remove(game_id);
        }
        Ok(())
    }

    async fn list_favorites(&self, uid: &str) -> Result<Vec<Favorite>> {
        Ok(self
            .favorites
            .get(uid)
            .map(|f| f.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Storage("upload rejected".to_string()));
        }
        self.objects
            .insert(path.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String> {
        if !self.objects.contains_key(path) {
            return Err(AppError::NotFound(path.to_string()));
        }
        Ok(format!("memory://{}", path))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.objects
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(path.to_string()))
    }
}
