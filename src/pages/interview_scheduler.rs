//! Public interview-booking page reached through an emailed link.
//!
//! Open to anyone holding the link; the token in the path is the only
//! credential, so no bearer token is involved.

#[cfg(test)]
#[path = "interview_scheduler_test.rs"]
mod tests;

use std::sync::{Arc, Mutex};

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use super::{lock, rejected};
use crate::hooks::ApiWithDelay;
use crate::net::types::InterviewSlot;
use crate::net::{ApiError, JratsApi};

pub const SCHEDULED: &str = "Interview scheduled successfully!";
pub const SCHEDULE_FAILED: &str = "Failed to schedule interview. The slot may be taken or the link may be invalid.";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduleView {
    /// Confirmation once the slot is booked.
    pub message: Option<String>,
    pub error: Option<String>,
}

pub struct InterviewSchedulerPage {
    api: Arc<dyn JratsApi>,
    hook: ApiWithDelay,
    token: String,
    view: Mutex<ScheduleView>,
}

impl InterviewSchedulerPage {
    #[must_use]
    pub fn new(api: Arc<dyn JratsApi>, hook: ApiWithDelay, token: impl Into<String>) -> Self {
        Self { api, hook, token: token.into(), view: Mutex::new(ScheduleView::default()) }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn hook(&self) -> &ApiWithDelay {
        &self.hook
    }

    #[must_use]
    pub fn view(&self) -> ScheduleView {
        lock(&self.view).clone()
    }

    /// The time picker shows until a booking succeeds, and hides while one
    /// is pending.
    #[must_use]
    pub fn shows_form(&self) -> bool {
        !self.hook.loading() && lock(&self.view).message.is_none()
    }

    /// Book the interview at `at`, returning the confirmation message.
    ///
    /// # Errors
    ///
    /// A malformed link fails locally; otherwise the server's error. The
    /// view's error is the server's `error` field or a generic hint.
    pub async fn submit(&self, at: OffsetDateTime) -> Result<String, ApiError> {
        *lock(&self.view) = ScheduleView::default();

        let Ok(token) = Uuid::parse_str(&self.token) else {
            tracing::warn!(token = %self.token, "malformed interview link");
            lock(&self.view).error = Some(SCHEDULE_FAILED.to_owned());
            return Err(rejected(SCHEDULE_FAILED));
        };

        let api = Arc::clone(&self.api);
        let slot = InterviewSlot { scheduled_time: at };
        let result = self.hook.execute(move || async move { api.schedule_interview(token, &slot).await }).await;

        let mut view = lock(&self.view);
        match result {
            Ok(response) => {
                let message = response.message.unwrap_or_else(|| SCHEDULED.to_owned());
                view.message = Some(message.clone());
                Ok(message)
            }
            Err(e) => {
                view.error = Some(e.payload_str("error").unwrap_or(SCHEDULE_FAILED).to_owned());
                Err(e)
            }
        }
    }
}

/// Parse a requested slot such as `2026-11-02T14:30:00Z`.
///
/// # Errors
///
/// Returns a validation error unless `raw` is RFC 3339.
pub fn parse_slot(raw: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339).map_err(|e| rejected(&format!("invalid interview time '{raw}': {e}")))
}
