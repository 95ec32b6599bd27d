//! Job list plus the viewer's own applications, shared by the applicant
//! dashboard and the all-jobs page.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::{ActionSlot, lock, observe, rejected};
use crate::net::types::{Application, Job};
use crate::net::{ApiError, JratsApi};
use crate::state::SessionStore;

pub const ALREADY_APPLIED: &str = "You have already applied for this job.";

/// What a job board renders.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BoardView {
    pub jobs: Vec<Job>,
    pub applications: Vec<Application>,
}

impl BoardView {
    #[must_use]
    pub fn applied_job_ids(&self) -> HashSet<i64> {
        self.applications.iter().map(|app| app.job).collect()
    }
}

pub(crate) struct Board {
    pub(crate) api: Arc<dyn JratsApi>,
    pub(crate) session: Arc<SessionStore>,
    view: Mutex<BoardView>,
    action: ActionSlot,
    notice: Mutex<Option<String>>,
}

impl Board {
    pub(crate) fn new(api: Arc<dyn JratsApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            view: Mutex::new(BoardView::default()),
            action: ActionSlot::default(),
            notice: Mutex::new(None),
        }
    }

    pub(crate) fn view(&self) -> BoardView {
        lock(&self.view).clone()
    }

    pub(crate) fn replace(&self, jobs: Vec<Job>, applications: Vec<Application>) {
        *lock(&self.view) = BoardView { jobs, applications };
    }

    pub(crate) fn applying(&self) -> Option<i64> {
        self.action.current()
    }

    pub(crate) fn notice(&self) -> Option<String> {
        lock(&self.notice).clone()
    }

    pub(crate) fn can_apply(&self, job_id: i64) -> bool {
        self.applying() != Some(job_id) && !lock(&self.view).applications.iter().any(|app| app.job == job_id)
    }

    /// Apply to `job_id` and append the new application. `describe` turns a
    /// failure into the notice shown to the user.
    pub(crate) async fn apply(
        &self,
        job_id: i64,
        describe: impl FnOnce(&ApiError) -> String,
    ) -> Result<Application, ApiError> {
        let already = lock(&self.view).applications.iter().any(|app| app.job == job_id);
        if already {
            *lock(&self.notice) = Some(ALREADY_APPLIED.to_owned());
            return Err(rejected(ALREADY_APPLIED));
        }

        let _claim = self.action.claim(job_id)?;
        *lock(&self.notice) = None;

        match self.api.apply(job_id).await {
            Ok(application) => {
                tracing::info!(job = job_id, application = application.id, "applied");
                lock(&self.view).applications.push(application.clone());
                Ok(application)
            }
            Err(e) => {
                let e = observe(&self.session, e);
                tracing::warn!(job = job_id, error = %e, "apply failed");
                *lock(&self.notice) = Some(describe(&e));
                Err(e)
            }
        }
    }
}
