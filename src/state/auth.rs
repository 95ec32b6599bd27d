//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`SessionStore`] is the single source of truth for "is someone signed
//! in". Route guards and pages read [`AuthState`] snapshots or subscribe to
//! changes; bearer tokens stay inside [`TokenStorage`] and the API client
//! and are never part of the observable state.
//!
//! The store is not reentrant: `login`, `logout` and `restore` must not
//! overlap. Callers serialize them (the CLI runs one command at a time,
//! pages disable their submit controls while a call is pending).

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use tokio::sync::watch;

use crate::net::types::{Credentials, UserProfile};
use crate::net::{ApiError, ApiErrorKind, JratsApi};
use crate::util::storage::{StorageError, TokenStorage};

/// Authentication state tracking the current user and restoration status.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    /// True until the startup restore has finished.
    pub loading: bool,
}

impl AuthState {
    /// Initial state: nobody known yet, restore pending.
    #[must_use]
    pub fn restoring() -> Self {
        Self { user: None, loading: true }
    }

    #[must_use]
    pub fn signed_in(user: UserProfile) -> Self {
        Self { user: Some(user), loading: false }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self { user: None, loading: false }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// How the startup restore ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    /// No stored token; nothing was fetched.
    NoSession,
    /// Stored token validated; the profile is now current.
    Restored(UserProfile),
    /// The server rejected the stored token; tokens were cleared.
    Expired,
    /// The profile could not be fetched for another reason. Tokens are kept
    /// so a later restore can retry; the user stays signed out meanwhile.
    Offline(ApiError),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// API failure kind, `None` for local storage failures.
    #[must_use]
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Self::Api(e) => Some(e.kind),
            Self::Storage(_) => None,
        }
    }
}

/// Owner of the current session. Pass it explicitly (behind an `Arc`) to
/// whatever needs it.
pub struct SessionStore {
    api: Arc<dyn JratsApi>,
    storage: Arc<dyn TokenStorage>,
    state: watch::Sender<AuthState>,
}

impl SessionStore {
    #[must_use]
    pub fn new(api: Arc<dyn JratsApi>, storage: Arc<dyn TokenStorage>) -> Self {
        let (state, _) = watch::channel(AuthState::restoring());
        Self { api, storage, state }
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Change notification for route guards and views.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Validate a stored token by fetching the profile. Always finishes
    /// with `loading == false`, whatever the outcome.
    pub async fn restore(&self) -> RestoreOutcome {
        let outcome = if self.storage.access_token().is_none() {
            RestoreOutcome::NoSession
        } else {
            match self.api.current_profile().await {
                Ok(profile) => RestoreOutcome::Restored(profile),
                Err(e) if e.is_session_invalid() => {
                    tracing::info!("stored session expired or invalid; signing out");
                    self.clear_tokens();
                    RestoreOutcome::Expired
                }
                Err(e) => {
                    tracing::warn!(error = %e, "could not validate stored session");
                    RestoreOutcome::Offline(e)
                }
            }
        };

        let next = match &outcome {
            RestoreOutcome::Restored(profile) => AuthState::signed_in(profile.clone()),
            _ => AuthState::signed_out(),
        };
        self.state.send_replace(next);
        outcome
    }

    /// Exchange credentials for tokens, persist them, then load the profile.
    ///
    /// # Errors
    ///
    /// `Authentication` when the credentials are rejected (nothing is
    /// written), any API error from the profile fetch (the new tokens are
    /// removed again), or a storage error if the tokens cannot be saved.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, SessionError> {
        let credentials = Credentials { email: email.to_owned(), password: password.to_owned() };
        let tokens = self.api.obtain_token(&credentials).await?;
        self.storage.save(&tokens)?;

        match self.api.current_profile().await {
            Ok(profile) => {
                tracing::info!(user = %profile.username, role = %profile.user_type, "signed in");
                self.state.send_replace(AuthState::signed_in(profile.clone()));
                Ok(profile)
            }
            Err(e) => {
                self.clear_tokens();
                Err(e.into())
            }
        }
    }

    /// Drop tokens and the in-memory user. Local only; never fails.
    pub fn logout(&self) {
        self.clear_tokens();
        self.state.send_replace(AuthState::signed_out());
        tracing::info!("signed out");
    }

    /// Apply the session side effect of an API failure: an invalid session
    /// signs the user out silently. Returns whether that happened.
    pub fn handle_error(&self, err: &ApiError) -> bool {
        if !err.is_session_invalid() {
            return false;
        }
        self.logout();
        true
    }

    fn clear_tokens(&self) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "failed to clear stored tokens");
        }
    }
}
