//! Account registration for applicants and recruiters.

#[cfg(test)]
#[path = "signup_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::lock;
use crate::hooks::ApiWithDelay;
use crate::net::types::{ApplicantSignup, RecruiterSignup, UserType};
use crate::net::{ApiError, JratsApi};
use crate::util::auth::LOGIN_PATH;

pub const SIGNUP_FAILED: &str = "Failed to sign up. Please check your details.";

/// Completed signup form for either role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignupForm {
    Applicant(ApplicantSignup),
    Recruiter(RecruiterSignup),
}

impl SignupForm {
    #[must_use]
    pub fn user_type(&self) -> UserType {
        match self {
            Self::Applicant(_) => UserType::Applicant,
            Self::Recruiter(_) => UserType::Recruiter,
        }
    }
}

/// Failure shown under the form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupErrors {
    pub message: Option<String>,
    /// Server field errors keyed by dotted path, e.g. `user.email`.
    pub fields: BTreeMap<String, Vec<String>>,
}

pub struct SignupPage {
    api: Arc<dyn JratsApi>,
    hook: ApiWithDelay,
    errors: Mutex<SignupErrors>,
}

impl SignupPage {
    #[must_use]
    pub fn new(api: Arc<dyn JratsApi>, hook: ApiWithDelay) -> Self {
        Self { api, hook, errors: Mutex::new(SignupErrors::default()) }
    }

    #[must_use]
    pub fn hook(&self) -> &ApiWithDelay {
        &self.hook
    }

    #[must_use]
    pub fn errors(&self) -> SignupErrors {
        lock(&self.errors).clone()
    }

    /// Register the account and return the path to continue at.
    ///
    /// # Errors
    ///
    /// Returns the server's error; field errors are kept for display.
    pub async fn submit(&self, form: SignupForm) -> Result<&'static str, ApiError> {
        *lock(&self.errors) = SignupErrors::default();
        let api = Arc::clone(&self.api);
        let user_type = form.user_type();

        let result = self
            .hook
            .execute(move || async move {
                match &form {
                    SignupForm::Applicant(applicant) => api.signup_applicant(applicant).await,
                    SignupForm::Recruiter(recruiter) => api.signup_recruiter(recruiter).await,
                }
            })
            .await;

        match result {
            Ok(()) => {
                tracing::info!(role = %user_type, "account created");
                Ok(LOGIN_PATH)
            }
            Err(e) => {
                tracing::warn!(role = %user_type, error = %e, "signup failed");
                *lock(&self.errors) = SignupErrors {
                    message: Some(SIGNUP_FAILED.to_owned()),
                    fields: e.field_errors.clone().unwrap_or_default(),
                };
                Err(e)
            }
        }
    }
}
