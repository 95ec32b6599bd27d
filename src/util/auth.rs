//! Route-protection decisions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route applies the same three gates: protected (optionally
//! role-restricted), public-only (login/signup), and the root home
//! redirect. They are pure functions of [`AuthState`] and are re-evaluated
//! on every navigation and every session change; nothing is cached.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::UserType;
use crate::state::auth::AuthState;

pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const ROOT_PATH: &str = "/";
pub const JOBS_PATH: &str = "/jobs";
pub const RECRUITER_HOME: &str = "/recruiter/dashboard";
pub const APPLICANT_HOME: &str = "/applicant/dashboard";

/// Outcome of a gate check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin,
    /// Redirect to `/`, which then resolves through [`home_redirect`].
    RedirectToHome,
}

impl RouteDecision {
    /// Redirect target, `None` for `Allow`.
    #[must_use]
    pub fn target(self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some(LOGIN_PATH),
            Self::RedirectToHome => Some(ROOT_PATH),
        }
    }
}

/// Gate for authenticated routes, optionally restricted to one role.
#[must_use]
pub fn protect(state: &AuthState, required: Option<UserType>) -> RouteDecision {
    let Some(user) = &state.user else {
        return RouteDecision::RedirectToLogin;
    };
    match required {
        Some(role) if user.user_type != role.as_str() => RouteDecision::RedirectToHome,
        _ => RouteDecision::Allow,
    }
}

/// Gate for authentication-entry pages: signed-in users are sent home.
#[must_use]
pub fn public_only(state: &AuthState) -> RouteDecision {
    if state.is_authenticated() { RouteDecision::RedirectToHome } else { RouteDecision::Allow }
}

/// Landing path for `/`: login when signed out, otherwise the role's dashboard.
#[must_use]
pub fn home_redirect(state: &AuthState) -> &'static str {
    match &state.user {
        None => LOGIN_PATH,
        Some(user) if user.user_type == UserType::Recruiter.as_str() => RECRUITER_HOME,
        Some(_) => APPLICANT_HOME,
    }
}

/// Whether a page should bounce to login: restore finished and nobody is signed in.
#[must_use]
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && state.user.is_none()
}
