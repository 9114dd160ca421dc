// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile state manager: create, read, update, and delete the user profile.

use crate::db::{profile_image_path, ProfileStore};
use crate::error::{AppError, Result};
use crate::models::{Profile, ProfileImage, ProfilePatch};
use crate::services::{AuthProvider, ObjectStore};
use crate::state::{KeyLocks, Liveness};
use crate::time_utils;
use std::sync::Arc;
use tokio::sync::watch;

/// Snapshot of the profile views' state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Data collected at sign-up for the first profile write.
#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    pub display_name: Option<String>,
    pub email: String,
    pub photo_url: Option<String>,
    pub favorite_team: Option<String>,
}

/// Owns the in-memory profile record.
#[derive(Clone)]
pub struct ProfileManager {
    store: Arc<dyn ProfileStore>,
    objects: Arc<dyn ObjectStore>,
    auth: Arc<dyn AuthProvider>,
    state: Arc<watch::Sender<ProfileState>>,
    /// Serializes reads and writes per user.
    user_locks: KeyLocks,
    liveness: Liveness,
}

impl ProfileManager {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        objects: Arc<dyn ObjectStore>,
        auth: Arc<dyn AuthProvider>,
        liveness: Liveness,
    ) -> Self {
        let (state, _) = watch::channel(ProfileState::default());
        Self {
            store,
            objects,
            auth,
            state: Arc::new(state),
            user_locks: KeyLocks::default(),
            liveness,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ProfileState {
        self.state.borrow().clone()
    }

    fn apply(&self, f: impl FnOnce(&mut ProfileState)) {
        if !self.liveness.is_live() {
            tracing::debug!("Context shut down, dropping profile state update");
            return;
        }
        self.state.send_modify(f);
    }

    fn begin(&self) {
        self.apply(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    fn fail(&self, err: &AppError, what: &str) {
        let message = err.user_message(what);
        self.apply(|s| {
            s.loading = false;
            s.error = Some(message);
        });
    }

    /// Read the stored profile. A missing document yields `None`.
    pub async fn fetch(&self, user_id: &str) -> Result<Option<Profile>> {
        let lock = self.user_locks.get(user_id.to_string());
        let _guard = lock.lock().await;

        self.begin();

        match self.store.get_profile(user_id).await {
            Ok(profile) => {
                tracing::debug!(user_id, found = profile.is_some(), "Fetched profile");
                let result = profile.clone();
                self.apply(|s| {
                    s.loading = false;
                    s.profile = profile;
                });
                Ok(result)
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to fetch profile");
                self.fail(&e, "fetch profile");
                Err(e)
            }
        }
    }

    /// Write the first, complete profile record for a new account.
    pub async fn create(&self, user_id: &str, data: NewProfile) -> Result<Profile> {
        let lock = self.user_locks.get(user_id.to_string());
        let _guard = lock.lock().await;

        self.begin();

        let now = time_utils::now_rfc3339();
        let profile = Profile {
            uid: user_id.to_string(),
            display_name: data.display_name.unwrap_or_default(),
            email: data.email,
            photo_url: data.photo_url.unwrap_or_default(),
            favorite_team: data.favorite_team.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        };

        match self.store.create_profile(&profile).await {
            Ok(()) => {
                tracing::info!(user_id, "Created profile");
                let result = profile.clone();
                self.apply(|s| {
                    s.loading = false;
                    s.profile = Some(profile);
                });
                Ok(result)
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to create profile");
                self.fail(&e, "create profile");
                Err(e)
            }
        }
    }

    /// Merge-write profile changes, optionally uploading a new image first.
    ///
    /// An image that cannot be read or uploaded is logged and skipped; the
    /// remaining fields are still written and the stored photo URL is left
    /// alone. A record that does not exist yet gets an empty photo URL.
    /// Returns the patch that was written.
    pub async fn update(
        &self,
        user_id: &str,
        changes: ProfilePatch,
        image: Option<ProfileImage>,
    ) -> Result<ProfilePatch> {
        let lock = self.user_locks.get(user_id.to_string());
        let _guard = lock.lock().await;

        self.begin();

        let mut patch = ProfilePatch {
            updated_at: Some(time_utils::now_rfc3339()),
            ..changes
        };

        if let Some(image) = image {
            match self.upload_image(user_id, &image).await {
                Ok(url) => patch.photo_url = Some(url),
                Err(e) => {
                    tracing::error!(
                        user_id,
                        error = %e,
                        "Profile image upload failed, continuing without it"
                    );
                }
            }
        }

        let stored = match self.store.get_profile(user_id).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to read current profile");
                self.fail(&e, "update profile");
                return Err(e);
            }
        };
        if stored.is_none() && patch.photo_url.is_none() {
            patch.photo_url = Some(String::new());
        }

        if let Err(e) = self.store.merge_profile(user_id, &patch).await {
            tracing::error!(user_id, error = %e, "Failed to update profile");
            self.fail(&e, "update profile");
            return Err(e);
        }

        tracing::info!(user_id, fields = ?patch.field_paths(), "Updated profile");

        let mut merged = stored.unwrap_or_else(|| Profile::empty(user_id));
        merged.merge(&patch);
        let result = merged.clone();
        self.apply(|s| {
            s.loading = false;
            s.profile = Some(result);
        });

        if let Err(e) = self.sync_account(user_id, &merged).await {
            tracing::error!(user_id, error = %e, "Failed to update account profile");
            self.fail(&e, "update profile");
            return Err(e);
        }

        Ok(patch)
    }

    /// Upload the image to `profile_images/{uid}` and return its URL.
    async fn upload_image(&self, user_id: &str, image: &ProfileImage) -> Result<String> {
        let (data, content_type) = image
            .load()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read image: {}", e)))?;

        let path = profile_image_path(user_id);
        self.objects.upload(&path, data, &content_type).await?;
        self.objects.download_url(&path).await
    }

    /// Push display name and photo to the auth account when they differ
    /// from the stored profile.
    async fn sync_account(&self, user_id: &str, profile: &Profile) -> Result<()> {
        let Some(current) = self.auth.current_user().filter(|u| u.uid == user_id) else {
            return Ok(());
        };

        let name_changed = !profile.display_name.is_empty()
            && current.display_name.as_deref() != Some(profile.display_name.as_str());

        if !name_changed && current.photo_url == profile.photo_url {
            return Ok(());
        }

        let display_name = name_changed.then_some(profile.display_name.as_str());
        self.auth
            .update_account(display_name, &profile.photo_url)
            .await
    }

    /// Delete the profile image, the profile, and the auth account.
    ///
    /// The account goes last since the earlier deletes need its session.
    pub async fn remove(&self, user_id: &str) -> Result<()> {
        let lock = self.user_locks.get(user_id.to_string());
        let _guard = lock.lock().await;

        self.begin();

        match self.objects.delete(&profile_image_path(user_id)).await {
            Ok(()) => tracing::debug!(user_id, "Deleted profile image"),
            Err(e) if e.is_not_found() => tracing::debug!(user_id, "No profile image to delete"),
            Err(e) => tracing::warn!(user_id, error = %e, "Failed to delete profile image"),
        }

        if let Err(e) = self.store.delete_profile(user_id).await {
            tracing::error!(user_id, error = %e, "Failed to delete profile");
            self.fail(&e, "delete account");
            return Err(e);
        }

        if self
            .auth
            .current_user()
            .is_some_and(|u| u.uid == user_id)
        {
            if let Err(e) = self.auth.delete_account().await {
                tracing::error!(user_id, error = %e, "Failed to delete account");
                self.fail(&e, "delete account");
                return Err(e);
            }
        } else {
            tracing::warn!(user_id, "No matching signed-in account, skipping account deletion");
        }

        tracing::info!(user_id, "Account removed");
        self.apply(|s| {
            s.loading = false;
            s.profile = None;
        });
        Ok(())
    }

    /// Forget the in-memory profile (on sign-out).
    pub fn reset(&self) {
        self.apply(|s| *s = ProfileState::default());
    }

    pub fn clear_error(&self) {
        self.apply(|s| s.error = None);
    }
}
