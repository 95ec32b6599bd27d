//! Path-to-page routing behind the auth gates.
//!
//! DESIGN
//! ======
//! `resolve` maps one path to one navigation step under the current
//! [`AuthState`]; `follow` chases redirects to the page that finally
//! renders. While the startup restore is pending every path resolves to
//! `Pending` so nothing renders against a half-restored session.
//!
//! | Path                          | Gate                         |
//! |-------------------------------|------------------------------|
//! | `/login`, `/signup`           | public-only                  |
//! | `/interview/schedule/{token}` | open                         |
//! | `/recruiter/dashboard`        | protected, recruiter         |
//! | `/applicant/dashboard`        | protected, applicant         |
//! | `/jobs`                       | protected, any role          |
//! | `/`                           | home redirect                |
//! | anything else                 | not found                    |

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::net::types::UserType;
use crate::state::auth::AuthState;
use crate::util::auth::{self, RouteDecision};

const MAX_REDIRECTS: usize = 4;

/// Screen rendered for a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Page {
    Login,
    Signup,
    InterviewScheduler { token: String },
    RecruiterDashboard,
    ApplicantDashboard,
    AllJobs,
    NotFound,
}

/// One routing step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Session restore still running.
    Pending,
    Render(Page),
    Redirect(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Route {
    Login,
    Signup,
    Schedule(String),
    RecruiterDashboard,
    ApplicantDashboard,
    Jobs,
    Root,
    Unknown,
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { auth::ROOT_PATH } else { trimmed }
}

fn match_path(path: &str) -> Route {
    let path = normalize(path);
    match path {
        auth::ROOT_PATH => Route::Root,
        auth::LOGIN_PATH => Route::Login,
        auth::SIGNUP_PATH => Route::Signup,
        auth::JOBS_PATH => Route::Jobs,
        auth::RECRUITER_HOME => Route::RecruiterDashboard,
        auth::APPLICANT_HOME => Route::ApplicantDashboard,
        _ => match path.strip_prefix("/interview/schedule/") {
            Some(token) if !token.is_empty() && !token.contains('/') => Route::Schedule(token.to_owned()),
            _ => Route::Unknown,
        },
    }
}

fn gate(decision: RouteDecision, page: Page) -> Navigation {
    match decision.target() {
        Some(target) => Navigation::Redirect(target),
        None => Navigation::Render(page),
    }
}

/// Resolve one navigation step for `path`.
#[must_use]
pub fn resolve(path: &str, state: &AuthState) -> Navigation {
    if state.loading {
        return Navigation::Pending;
    }
    match match_path(path) {
        Route::Login => gate(auth::public_only(state), Page::Login),
        Route::Signup => gate(auth::public_only(state), Page::Signup),
        Route::Schedule(token) => Navigation::Render(Page::InterviewScheduler { token }),
        Route::RecruiterDashboard => gate(auth::protect(state, Some(UserType::Recruiter)), Page::RecruiterDashboard),
        Route::ApplicantDashboard => gate(auth::protect(state, Some(UserType::Applicant)), Page::ApplicantDashboard),
        Route::Jobs => gate(auth::protect(state, None), Page::AllJobs),
        Route::Root => Navigation::Redirect(auth::home_redirect(state)),
        Route::Unknown => Navigation::Render(Page::NotFound),
    }
}

/// Final destination of a navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Destination {
    /// Path after all redirects.
    pub path: String,
    pub page: Page,
}

/// Chase redirects from `path`. `None` while the session is restoring.
#[must_use]
pub fn follow(path: &str, state: &AuthState) -> Option<Destination> {
    let mut current = normalize(path).to_owned();
    for _ in 0..=MAX_REDIRECTS {
        match resolve(&current, state) {
            Navigation::Pending => return None,
            Navigation::Render(page) => return Some(Destination { path: current, page }),
            Navigation::Redirect(target) => current = target.to_owned(),
        }
    }
    tracing::warn!(path, "redirect chain too long");
    Some(Destination { path: current, page: Page::NotFound })
}

/// Re-resolve `path` on every session change and hand each result to
/// `on_change`. The first call reflects the state at spawn time. The task
/// ends when the session store is dropped.
pub fn spawn_route_watcher<F>(mut rx: watch::Receiver<AuthState>, path: String, mut on_change: F) -> JoinHandle<()>
where
    F: FnMut(Navigation) + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let state = rx.borrow_and_update().clone();
            on_change(resolve(&path, &state));
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}
