//! Page models: one struct per screen holding its view state and actions.
//!
//! SYSTEM CONTEXT
//! ==============
//! A page owns an [`ApiWithDelay`](crate::hooks::ApiWithDelay) for its
//! primary load or submit, plus whatever list and selection state the
//! screen renders. Actions take `&self` so a renderer can read the view
//! (including which item is busy) while a call is still pending. Every
//! API failure passes through [`SessionStore::handle_error`] so an expired
//! session signs the user out wherever it is noticed.

pub mod all_jobs;
pub mod applicant_dashboard;
pub mod interview_scheduler;
pub mod login;
pub mod recruiter_dashboard;
pub mod signup;

mod board;

pub use all_jobs::AllJobsPage;
pub use applicant_dashboard::ApplicantDashboard;
pub use board::{ALREADY_APPLIED, BoardView};
pub use interview_scheduler::InterviewSchedulerPage;
pub use login::LoginPage;
pub use recruiter_dashboard::RecruiterDashboard;
pub use signup::{SignupForm, SignupPage};

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::net::{ApiError, ApiErrorKind};
use crate::state::SessionStore;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run the session side effect of `err` and hand it back.
pub(crate) fn observe(session: &SessionStore, err: ApiError) -> ApiError {
    if session.handle_error(&err) {
        tracing::info!("session rejected by server; signed out");
    }
    err
}

/// The id of the one list item with an action in flight.
#[derive(Debug, Default)]
pub(crate) struct ActionSlot(Mutex<Option<i64>>);

impl ActionSlot {
    pub(crate) fn current(&self) -> Option<i64> {
        *lock(&self.0)
    }

    /// Mark `id` busy until the returned claim is dropped.
    pub(crate) fn claim(&self, id: i64) -> Result<ActionClaim<'_>, ApiError> {
        let mut slot = lock(&self.0);
        if slot.is_some() {
            return Err(ApiError::busy());
        }
        *slot = Some(id);
        Ok(ActionClaim { slot: self })
    }
}

pub(crate) struct ActionClaim<'a> {
    slot: &'a ActionSlot,
}

impl Drop for ActionClaim<'_> {
    fn drop(&mut self) {
        *lock(&self.slot.0) = None;
    }
}

/// Local rejection that never reached the server.
pub(crate) fn rejected(message: &str) -> ApiError {
    ApiError::new(ApiErrorKind::ValidationRejected, message)
}
