// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session models shared by the auth provider and the auth state manager.

use serde::{Deserialize, Serialize};

/// Summary of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub uid: String,
    pub email: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    /// Empty when the account has no photo
    #[serde(rename = "photoURL", default)]
    pub photo_url: String,
}

/// Session-change notification emitted by an auth provider.
///
/// `None` means signed out.
pub type AuthSession = Option<SessionUser>;
