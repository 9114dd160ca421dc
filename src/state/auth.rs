// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth state manager and the session subscription guard.

use crate::error::{AppError, Result};
use crate::models::{AuthSession, SessionUser};
use crate::services::AuthProvider;
use crate::state::Liveness;
use crate::validation::{SignInForm, SignUpForm};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Snapshot of the session as the views see it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub authenticated: bool,
    pub user: Option<SessionUser>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Owns the authenticated flag and current user summary.
///
/// `sign_in`, `sign_up`, and `sign_out` never set the session themselves;
/// the session subscription does when the provider reports the change.
#[derive(Clone)]
pub struct AuthManager {
    provider: Arc<dyn AuthProvider>,
    state: Arc<watch::Sender<AuthState>>,
    liveness: Liveness,
}

impl AuthManager {
    pub fn new(provider: Arc<dyn AuthProvider>, liveness: Liveness) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            provider,
            state: Arc::new(state),
            liveness,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().authenticated
    }

    /// Session changes as published by the provider.
    pub(crate) fn provider_sessions(&self) -> watch::Receiver<AuthSession> {
        self.provider.subscribe()
    }

    fn apply(&self, f: impl FnOnce(&mut AuthState)) {
        if !self.liveness.is_live() {
            tracing::debug!("Context shut down, dropping auth state update");
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

    fn finish<T>(&self, result: Result<T>, what: &str) -> Result<T> {
        match &result {
            Ok(_) => self.apply(|s| s.loading = false),
            Err(e) => {
                let message = e.user_message(what);
                self.apply(|s| {
                    s.loading = false;
                    s.error = Some(message);
                });
            }
        }
        result
    }

    /// Record a session change reported by the provider.
    pub fn apply_session(&self, session: &AuthSession) {
        let user = session.clone();
        tracing::debug!(authenticated = user.is_some(), "Session changed");
        self.apply(|s| {
            s.authenticated = user.is_some();
            s.user = user;
            s.loading = false;
        });
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser> {
        let form = SignInForm::new(email, password);
        if let Err(e) = form.check() {
            return self.finish(Err(e), "sign in");
        }

        self.begin();
        let result = self.provider.sign_in(&form.email, &form.password).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Sign-in failed");
        }
        self.finish(result, "sign in")
    }

    /// Create an account. The returned user is what the caller passes on
    /// to profile creation.
    pub async fn sign_up(&self, form: SignUpForm) -> Result<SessionUser> {
        if let Err(e) = form.check() {
            return self.finish(Err(e), "sign up");
        }

        self.begin();
        let result = self
            .provider
            .sign_up(
                form.email.trim(),
                &form.password,
                form.display_name.trim(),
            )
            .await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Sign-up failed");
        }
        self.finish(result, "sign up")
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.begin();
        let result = self.provider.sign_out().await;
        self.finish(result, "sign out")
    }

    pub fn clear_error(&self) {
        self.apply(|s| s.error = None);
    }

    /// Reject the call unless someone is signed in, returning their ID.
    pub fn require_user(&self) -> Result<String> {
        self.state
            .borrow()
            .user
            .as_ref()
            .map(|u| u.uid.clone())
            .ok_or(AppError::Unauthorized)
    }
}

/// Guard for the running session listener.
///
/// The listener task is aborted exactly once, on [`unsubscribe`] or drop.
///
/// [`unsubscribe`]: SessionSubscription::unsubscribe
pub struct SessionSubscription {
    handle: Option<JoinHandle<()>>,
}

impl SessionSubscription {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("Session subscription released");
        }
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        self.release();
    }
}
