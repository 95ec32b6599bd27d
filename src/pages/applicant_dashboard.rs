//! Applicant landing page: open jobs and the applicant's own applications.

#[cfg(test)]
#[path = "applicant_dashboard_test.rs"]
mod tests;

use std::collections::HashSet;
use std::sync::Arc;

use super::board::{ALREADY_APPLIED, Board, BoardView};
use super::observe;
use crate::hooks::ApiWithDelay;
use crate::net::types::Application;
use crate::net::{ApiError, JratsApi};
use crate::state::SessionStore;

pub const APPLY_FAILED: &str = "An error occurred while submitting your application.";

pub struct ApplicantDashboard {
    board: Board,
    hook: ApiWithDelay,
}

impl ApplicantDashboard {
    #[must_use]
    pub fn new(api: Arc<dyn JratsApi>, session: Arc<SessionStore>, hook: ApiWithDelay) -> Self {
        Self { board: Board::new(api, session), hook }
    }

    /// Loading/error state of the page load.
    #[must_use]
    pub fn hook(&self) -> &ApiWithDelay {
        &self.hook
    }

    #[must_use]
    pub fn view(&self) -> BoardView {
        self.board.view()
    }

    #[must_use]
    pub fn applied_job_ids(&self) -> HashSet<i64> {
        self.board.view().applied_job_ids()
    }

    /// Whether the apply control for `job_id` is enabled.
    #[must_use]
    pub fn can_apply(&self, job_id: i64) -> bool {
        self.board.can_apply(job_id)
    }

    /// Job whose application is being submitted.
    #[must_use]
    pub fn applying(&self) -> Option<i64> {
        self.board.applying()
    }

    /// Outcome message of the last failed apply.
    #[must_use]
    pub fn notice(&self) -> Option<String> {
        self.board.notice()
    }

    /// Fetch jobs and applications together under the latency floor.
    ///
    /// # Errors
    ///
    /// Returns the first failing request's error; the previous view is kept.
    pub async fn load(&self) -> Result<(), ApiError> {
        let api = Arc::clone(&self.board.api);
        let loaded = self
            .hook
            .execute(move || async move { tokio::try_join!(api.list_jobs(), api.list_applications()) })
            .await;

        match loaded {
            Ok((jobs, applications)) => {
                tracing::debug!(jobs = jobs.len(), applications = applications.len(), "applicant dashboard loaded");
                self.board.replace(jobs, applications);
                Ok(())
            }
            Err(e) => Err(observe(&self.board.session, e)),
        }
    }

    /// Apply to `job_id`.
    ///
    /// # Errors
    ///
    /// Fails locally when the job was already applied to or another apply
    /// is in flight, otherwise with the server's error.
    pub async fn apply(&self, job_id: i64) -> Result<Application, ApiError> {
        self.board
            .apply(job_id, |e| if e.status == Some(400) { ALREADY_APPLIED } else { APPLY_FAILED }.to_owned())
            .await
    }
}
