//! Login form.

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;

use std::sync::{Arc, Mutex};

use super::lock;
use crate::hooks::ApiWithDelay;
use crate::net::{ApiError, ApiErrorKind};
use crate::state::{SessionError, SessionStore};
use crate::util::auth;

pub const LOGIN_FAILED: &str = "Failed to log in. Please check your credentials.";

pub struct LoginPage {
    session: Arc<SessionStore>,
    hook: ApiWithDelay,
    error: Mutex<Option<String>>,
}

impl LoginPage {
    #[must_use]
    pub fn new(session: Arc<SessionStore>, hook: ApiWithDelay) -> Self {
        Self { session, hook, error: Mutex::new(None) }
    }

    #[must_use]
    pub fn hook(&self) -> &ApiWithDelay {
        &self.hook
    }

    /// Inline message under the form.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        lock(&self.error).clone()
    }

    /// Sign in and return the landing path for the user's role.
    ///
    /// # Errors
    ///
    /// Returns the login failure; the inline message is always the same
    /// generic credentials hint.
    pub async fn submit(&self, email: &str, password: &str) -> Result<&'static str, ApiError> {
        *lock(&self.error) = None;
        let session = Arc::clone(&self.session);
        let (email, password) = (email.to_owned(), password.to_owned());

        let result = self
            .hook
            .execute(move || async move { session.login(&email, &password).await.map_err(into_api_error) })
            .await;

        match result {
            Ok(_) => Ok(auth::home_redirect(&self.session.snapshot())),
            Err(e) => {
                tracing::warn!(kind = ?e.kind, "login failed");
                *lock(&self.error) = Some(LOGIN_FAILED.to_owned());
                Err(e)
            }
        }
    }
}

fn into_api_error(err: SessionError) -> ApiError {
    match err {
        SessionError::Api(e) => e,
        SessionError::Storage(e) => ApiError::new(ApiErrorKind::RequestFailed, e.to_string()),
    }
}
