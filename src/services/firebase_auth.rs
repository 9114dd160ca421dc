// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Authentication client (Identity Toolkit REST API).
//!
//! Handles:
//! - Email/password sign-in and sign-up
//! - Account profile updates and account deletion
//! - ID token refresh before expiry
//! - Session-change notifications for the auth state manager

use crate::error::AppError;
use crate::models::{AuthSession, SessionUser};
use crate::services::AuthProvider;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::{watch, Mutex};

const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";

/// Margin before ID token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Tokens for the signed-in user.
struct SessionTokens {
    id_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

/// Firebase Authentication provider.
///
/// The session lives only in memory; persisting it across process restarts
/// is left to the embedding application.
pub struct FirebaseAuth {
    http: reqwest::Client,
    api_key: String,
    identity_url: String,
    token_url: String,
    /// Serializes token refresh so concurrent callers share one refresh.
    tokens: Mutex<Option<SessionTokens>>,
    session: watch::Sender<AuthSession>,
}

impl FirebaseAuth {
    pub fn new(api_key: &str) -> Self {
        Self::with_endpoints(api_key, DEFAULT_IDENTITY_URL, DEFAULT_SECURE_TOKEN_URL)
    }

    /// Create a client against non-default endpoints (emulator or tests).
    pub fn with_endpoints(api_key: &str, identity_url: &str, token_url: &str) -> Self {
        let (session, _) = watch::channel(None);
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            identity_url: identity_url.trim_end_matches('/').to_string(),
            token_url: token_url.trim_end_matches('/').to_string(),
            tokens: Mutex::new(None),
            session,
        }
    }

    /// POST to an Identity Toolkit `accounts:{method}` endpoint.
    async fn post_accounts<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let url = format!("{}/accounts:{}", self.identity_url, method);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Authentication request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body, mapping Firebase error codes.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let code = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {}", status));

            tracing::warn!(status = %status, code = %code, "Firebase auth request rejected");
            return Err(AppError::Auth(auth_error_message(&code)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Failed to parse auth response: {}", e)))
    }

    /// Store fresh tokens from a sign-in or sign-up response.
    async fn store_tokens(&self, id_token: &str, refresh_token: &str, expires_in: &str) {
        let secs = expires_in.parse::<i64>().unwrap_or(3600);
        *self.tokens.lock().await = Some(SessionTokens {
            id_token: id_token.to_string(),
            refresh_token: refresh_token.to_string(),
            expires_at: Utc::now() + Duration::seconds(secs),
        });
    }

    /// Look up the account behind an ID token.
    async fn lookup(&self, id_token: &str) -> Result<Option<AccountInfo>, AppError> {
        let response: LookupResponse = self
            .post_accounts("lookup", &serde_json::json!({ "idToken": id_token }))
            .await?;
        Ok(response.users.into_iter().next())
    }

    /// Exchange the refresh token for a new ID token.
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.token_url))
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Token refresh request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    fn clear_session(&self) {
        self.session.send_replace(None);
    }
}

#[async_trait]
impl AuthProvider for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser, AppError> {
        let response: SignInResponse = self
            .post_accounts(
                "signInWithPassword",
                &serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        self.store_tokens(
            &response.id_token,
            &response.refresh_token,
            &response.expires_in,
        )
        .await;

        // signInWithPassword does not return the photo URL.
        let photo_url = match self.lookup(&response.id_token).await {
            Ok(account) => account.and_then(|a| a.photo_url).unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Account lookup failed after sign-in");
                String::new()
            }
        };

        let user = SessionUser {
            uid: response.local_id,
            email: response.email,
            display_name: response.display_name.filter(|n| !n.is_empty()),
            photo_url,
        };

        tracing::info!(uid = %user.uid, "Signed in");
        self.session.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SessionUser, AppError> {
        let response: SignInResponse = self
            .post_accounts(
                "signUp",
                &serde_json::json!({
                    "email": email,
                    "password": password,
                    "displayName": display_name,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        self.store_tokens(
            &response.id_token,
            &response.refresh_token,
            &response.expires_in,
        )
        .await;

        let user = SessionUser {
            uid: response.local_id,
            email: response.email,
            display_name: Some(display_name.to_string()),
            photo_url: String::new(),
        };

        tracing::info!(uid = %user.uid, "Account created");
        self.session.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        *self.tokens.lock().await = None;
        self.clear_session();
        tracing::info!("Signed out");
        Ok(())
    }

    async fn update_account(
        &self,
        display_name: Option<&str>,
        photo_url: &str,
    ) -> Result<(), AppError> {
        let id_token = self.id_token().await?;

        let mut body = serde_json::json!({
            "idToken": id_token,
            "returnSecureToken": false,
        });
        if let Some(name) = display_name {
            body["displayName"] = name.into();
        }
        if photo_url.is_empty() {
            body["deleteAttribute"] = serde_json::json!(["PHOTO_URL"]);
        } else {
            body["photoUrl"] = photo_url.into();
        }

        let _: serde_json::Value = self.post_accounts("update", &body).await?;

        // Profile edits are not session changes; update the summary silently.
        self.session.send_if_modified(|session| {
            if let Some(user) = session.as_mut() {
                if let Some(name) = display_name {
                    user.display_name = Some(name.to_string());
                }
                user.photo_url = photo_url.to_string();
            }
            false
        });

        tracing::info!("Account profile updated");
        Ok(())
    }

    async fn delete_account(&self) -> Result<(), AppError> {
        let id_token = self.id_token().await?;

        let _: serde_json::Value = self
            .post_accounts("delete", &serde_json::json!({ "idToken": id_token }))
            .await?;

        *self.tokens.lock().await = None;
        self.clear_session();
        tracing::info!("Account deleted");
        Ok(())
    }

    fn current_user(&self) -> Option<SessionUser> {
        self.session.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<AuthSession> {
        self.session.subscribe()
    }

    async fn id_token(&self) -> Result<String, AppError> {
        let now = Utc::now();
        let margin = Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);

        let mut guard = self.tokens.lock().await;
        let tokens = guard.as_mut().ok_or(AppError::Unauthorized)?;

        if now + margin < tokens.expires_at {
            return Ok(tokens.id_token.clone());
        }

        tracing::info!("ID token expiring, refreshing");
        let refreshed = match self.refresh(&tokens.refresh_token).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, ending session");
                *guard = None;
                drop(guard);
                self.clear_session();
                return Err(e);
            }
        };

        let secs = refreshed.expires_in.parse::<i64>().unwrap_or(3600);
        tokens.id_token = refreshed.id_token.clone();
        tokens.refresh_token = refreshed.refresh_token;
        tokens.expires_at = now + Duration::seconds(secs);

        // A refresh counts as a session change for listeners.
        self.session.send_modify(|_| {});
        Ok(refreshed.id_token)
    }
}

/// Map a Firebase error code to a user-facing message.
fn auth_error_message(code: &str) -> String {
    let code = code.split([' ', ':']).next().unwrap_or(code);
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Invalid email or password".to_string()
        }
        "EMAIL_EXISTS" => "An account already exists for this email".to_string(),
        "WEAK_PASSWORD" => "Password must be at least 6 characters".to_string(),
        "INVALID_EMAIL" => "Please enter a valid email address".to_string(),
        "USER_DISABLED" => "This account has been disabled".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts, please try again later".to_string(),
        "TOKEN_EXPIRED" | "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" | "INVALID_ID_TOKEN"
        | "INVALID_REFRESH_TOKEN" => "Please sign in again".to_string(),
        other => format!("Authentication failed: {}", other),
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Response of `accounts:signInWithPassword` and `accounts:signUp`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    #[serde(default)]
    photo_url: Option<String>,
}

/// Response of the Secure Token `token` endpoint.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
}
