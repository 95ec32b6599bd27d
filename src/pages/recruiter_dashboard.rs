//! Recruiter landing page: applications to the recruiter's jobs, an
//! application detail view with invite/reject, and job creation.
//!
//! The list load goes through the latency floor. Opening a detail,
//! advancing and creating a job are direct calls with their own busy
//! markers, so the list stays interactive while they run.

#[cfg(test)]
#[path = "recruiter_dashboard_test.rs"]
mod tests;

use std::sync::{Arc, Mutex};

use super::{ActionSlot, lock, observe, rejected};
use crate::hooks::ApiWithDelay;
use crate::net::types::{AdvanceAction, Application, ApplicationDetail, ApplicationStatus, Job, NewJob};
use crate::net::{ApiError, JratsApi};
use crate::state::SessionStore;

pub const DETAIL_FAILED: &str = "Could not load application details.";
pub const CREATE_JOB_FAILED: &str = "Failed to create job. Please try again.";
const NOT_REVIEWABLE: &str = "This application has already been decided.";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecruiterView {
    pub applications: Vec<Application>,
    /// Open detail, if any.
    pub selected: Option<ApplicationDetail>,
    pub detail_loading: bool,
    pub creating_job: bool,
    pub notice: Option<String>,
}

pub struct RecruiterDashboard {
    api: Arc<dyn JratsApi>,
    session: Arc<SessionStore>,
    hook: ApiWithDelay,
    view: Mutex<RecruiterView>,
    action: ActionSlot,
}

impl RecruiterDashboard {
    #[must_use]
    pub fn new(api: Arc<dyn JratsApi>, session: Arc<SessionStore>, hook: ApiWithDelay) -> Self {
        Self { api, session, hook, view: Mutex::new(RecruiterView::default()), action: ActionSlot::default() }
    }

    #[must_use]
    pub fn hook(&self) -> &ApiWithDelay {
        &self.hook
    }

    #[must_use]
    pub fn view(&self) -> RecruiterView {
        lock(&self.view).clone()
    }

    /// Application being invited or rejected.
    #[must_use]
    pub fn advancing(&self) -> Option<i64> {
        self.action.current()
    }

    /// Whether invite/reject controls are offered for application `id`.
    #[must_use]
    pub fn can_advance(&self, id: i64) -> bool {
        self.advancing() != Some(id) && self.status_of(id).is_none_or(ApplicationStatus::is_reviewable)
    }

    /// # Errors
    ///
    /// Returns the list request's error; the previous list is kept.
    pub async fn load(&self) -> Result<(), ApiError> {
        let api = Arc::clone(&self.api);
        match self.hook.execute(move || async move { api.list_applications().await }).await {
            Ok(applications) => {
                lock(&self.view).applications = applications;
                Ok(())
            }
            Err(e) => Err(observe(&self.session, e)),
        }
    }

    /// Open the detail for application `id`. A failure closes the detail.
    ///
    /// # Errors
    ///
    /// Returns the detail request's error.
    pub async fn open_detail(&self, id: i64) -> Result<ApplicationDetail, ApiError> {
        {
            let mut view = lock(&self.view);
            view.detail_loading = true;
            view.notice = None;
        }

        let result = self.api.application_detail(id).await;

        let mut view = lock(&self.view);
        view.detail_loading = false;
        match result {
            Ok(detail) => {
                view.selected = Some(detail.clone());
                Ok(detail)
            }
            Err(e) => {
                view.selected = None;
                view.notice = Some(DETAIL_FAILED.to_owned());
                drop(view);
                Err(observe(&self.session, e))
            }
        }
    }

    pub fn close_detail(&self) {
        lock(&self.view).selected = None;
    }

    /// Invite or reject application `id`, then refresh the list. The open
    /// detail closes if it showed this application.
    ///
    /// # Errors
    ///
    /// Fails locally when the application is no longer reviewable or
    /// another advance is in flight, otherwise with the server's error.
    pub async fn advance(&self, id: i64, action: AdvanceAction) -> Result<(), ApiError> {
        if self.status_of(id).is_some_and(|status| !status.is_reviewable()) {
            return Err(rejected(NOT_REVIEWABLE));
        }
        let _claim = self.action.claim(id)?;
        lock(&self.view).notice = None;

        let result = async {
            self.api.advance_application(id, action).await?;
            self.api.list_applications().await
        }
        .await;

        match result {
            Ok(applications) => {
                tracing::info!(application = id, action = action.as_str(), "application advanced");
                let mut view = lock(&self.view);
                view.applications = applications;
                if view.selected.as_ref().is_some_and(|detail| detail.id == id) {
                    view.selected = None;
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(application = id, action = action.as_str(), error = %e, "advance failed");
                lock(&self.view).notice = Some(format!("Error: Could not {} the application.", action.as_str()));
                Err(observe(&self.session, e))
            }
        }
    }

    /// Post a new job.
    ///
    /// # Errors
    ///
    /// Returns the server's error; the notice is set to a retry message.
    pub async fn create_job(&self, job: &NewJob) -> Result<Job, ApiError> {
        {
            let mut view = lock(&self.view);
            if view.creating_job {
                return Err(ApiError::busy());
            }
            view.creating_job = true;
            view.notice = None;
        }

        let result = self.api.create_job(job).await;

        let mut view = lock(&self.view);
        view.creating_job = false;
        match result {
            Ok(created) => {
                tracing::info!(job = created.id, title = %created.title, "job created");
                view.notice = Some(format!("Successfully created job: \"{}\"", created.title));
                Ok(created)
            }
            Err(e) => {
                view.notice = Some(CREATE_JOB_FAILED.to_owned());
                drop(view);
                Err(observe(&self.session, e))
            }
        }
    }

    fn status_of(&self, id: i64) -> Option<ApplicationStatus> {
        let view = lock(&self.view);
        view.selected
            .as_ref()
            .filter(|detail| detail.id == id)
            .map(|detail| detail.status)
            .or_else(|| view.applications.iter().find(|app| app.id == id).map(|app| app.status))
    }
}
