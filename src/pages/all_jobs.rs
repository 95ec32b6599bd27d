//! Every open job, visible to all signed-in users. Only applicants see
//! their applications and can apply from here.

#[cfg(test)]
#[path = "all_jobs_test.rs"]
mod tests;

use std::sync::Arc;

use super::board::{ALREADY_APPLIED, Board, BoardView};
use super::{observe, rejected};
use crate::hooks::ApiWithDelay;
use crate::net::types::{Application, UserType};
use crate::net::{ApiError, JratsApi};
use crate::state::SessionStore;

const APPLICANTS_ONLY: &str = "Only applicants can apply for jobs.";

pub struct AllJobsPage {
    board: Board,
    hook: ApiWithDelay,
}

impl AllJobsPage {
    #[must_use]
    pub fn new(api: Arc<dyn JratsApi>, session: Arc<SessionStore>, hook: ApiWithDelay) -> Self {
        Self { board: Board::new(api, session), hook }
    }

    #[must_use]
    pub fn hook(&self) -> &ApiWithDelay {
        &self.hook
    }

    #[must_use]
    pub fn view(&self) -> BoardView {
        self.board.view()
    }

    /// Whether the current user gets apply controls at all.
    #[must_use]
    pub fn shows_apply(&self) -> bool {
        self.board.session.user().and_then(|u| u.role()) == Some(UserType::Applicant)
    }

    #[must_use]
    pub fn can_apply(&self, job_id: i64) -> bool {
        self.shows_apply() && self.board.can_apply(job_id)
    }

    #[must_use]
    pub fn applying(&self) -> Option<i64> {
        self.board.applying()
    }

    #[must_use]
    pub fn notice(&self) -> Option<String> {
        self.board.notice()
    }

    /// Fetch jobs, and the applicant's own applications when the viewer is
    /// an applicant, under the latency floor.
    ///
    /// # Errors
    ///
    /// Returns the first failing request's error.
    pub async fn load(&self) -> Result<(), ApiError> {
        let api = Arc::clone(&self.board.api);
        let with_applications = self.shows_apply();
        let loaded = self
            .hook
            .execute(move || async move {
                let applications = async {
                    if with_applications { api.list_applications().await } else { Ok(Vec::new()) }
                };
                tokio::try_join!(api.list_jobs(), applications)
            })
            .await;

        match loaded {
            Ok((jobs, applications)) => {
                self.board.replace(jobs, applications);
                Ok(())
            }
            Err(e) => Err(observe(&self.board.session, e)),
        }
    }

    /// Apply to `job_id`; failures show the server's `detail` when present.
    ///
    /// # Errors
    ///
    /// Fails locally for non-applicants, repeat applications and
    /// overlapping applies, otherwise with the server's error.
    pub async fn apply(&self, job_id: i64) -> Result<Application, ApiError> {
        if !self.shows_apply() {
            return Err(rejected(APPLICANTS_ONLY));
        }
        self.board
            .apply(job_id, |e| e.payload_str("detail").unwrap_or(ALREADY_APPLIED).to_owned())
            .await
    }
}
