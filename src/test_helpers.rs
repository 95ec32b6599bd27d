//! Shared fixtures for unit tests: a scripted [`JratsApi`] and sample payloads.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use uuid::Uuid;

use crate::net::error::{ApiError, ApiErrorKind, Endpoint};
use crate::net::types::*;
use crate::net::JratsApi;
use crate::state::SessionStore;
use crate::util::storage::MemoryTokenStorage;

// =============================================================================
// FIXTURES
// =============================================================================

pub fn profile(user_type: &str) -> UserProfile {
    UserProfile {
        id: 1,
        username: format!("{user_type}-user"),
        email: format!("{user_type}@example.com"),
        user_type: user_type.to_owned(),
        recruiter_profile: None,
        applicant_profile: None,
    }
}

pub fn tokens() -> TokenPair {
    TokenPair { access: "access-token".into(), refresh: "refresh-token".into() }
}

pub fn job(id: i64) -> Job {
    Job {
        id,
        title: format!("Job {id}"),
        description: "Build things".into(),
        location: "Remote".into(),
        created_at: None,
    }
}

pub fn application(id: i64, job: i64, status: ApplicationStatus) -> Application {
    Application { id, job, applicant: 1, status, applied_at: None }
}

pub fn detail(id: i64, status: ApplicationStatus) -> ApplicationDetail {
    ApplicationDetail {
        id,
        job: job(1),
        applicant: ApplicantSummary {
            user: ApplicantUser { username: "ada".into(), email: "ada@example.com".into() },
            resume: Some("/media/resumes/ada.pdf".into()),
            skills: "rust".into(),
        },
        status,
        applied_at: None,
    }
}

pub fn http_error(endpoint: Endpoint, status: u16, body: &str) -> ApiError {
    ApiError::from_response(endpoint, status, body)
}

pub fn network_error() -> ApiError {
    ApiError::new(ApiErrorKind::RequestFailed, "connection refused")
}

// =============================================================================
// MockApi
// =============================================================================

/// Scripted API: each method pops the next queued result for its endpoint.
/// An empty queue yields a `RequestFailed` so unexpected calls are visible.
#[derive(Default)]
pub struct MockApi {
    pub token: Mutex<VecDeque<Result<TokenPair, ApiError>>>,
    pub profile: Mutex<VecDeque<Result<UserProfile, ApiError>>>,
    pub jobs: Mutex<VecDeque<Result<Vec<Job>, ApiError>>>,
    pub created_jobs: Mutex<VecDeque<Result<Job, ApiError>>>,
    pub applications: Mutex<VecDeque<Result<Vec<Application>, ApiError>>>,
    pub applied: Mutex<VecDeque<Result<Application, ApiError>>>,
    pub details: Mutex<VecDeque<Result<ApplicationDetail, ApiError>>>,
    pub advanced: Mutex<VecDeque<Result<MessageResponse, ApiError>>>,
    pub signups: Mutex<VecDeque<Result<(), ApiError>>>,
    pub schedules: Mutex<VecDeque<Result<MessageResponse, ApiError>>>,
    /// Artificial latency applied to every call.
    pub latency: Duration,
    /// Endpoint names in call order.
    pub calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency, ..Self::default() }
    }

    pub fn push<T>(queue: &Mutex<VecDeque<Result<T, ApiError>>>, result: Result<T, ApiError>) {
        queue.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn next<T>(&self, name: &str, queue: &Mutex<VecDeque<Result<T, ApiError>>>) -> Result<T, ApiError> {
        self.calls.lock().unwrap().push(name.to_owned());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let next = queue.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(ApiError::new(ApiErrorKind::RequestFailed, format!("unscripted call: {name}"))))
    }
}

#[async_trait::async_trait]
impl JratsApi for MockApi {
    async fn obtain_token(&self, _credentials: &Credentials) -> Result<TokenPair, ApiError> {
        self.next("obtain_token", &self.token).await
    }

    async fn current_profile(&self) -> Result<UserProfile, ApiError> {
        self.next("current_profile", &self.profile).await
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        self.next("list_jobs", &self.jobs).await
    }

    async fn create_job(&self, _job: &NewJob) -> Result<Job, ApiError> {
        self.next("create_job", &self.created_jobs).await
    }

    async fn list_applications(&self) -> Result<Vec<Application>, ApiError> {
        self.next("list_applications", &self.applications).await
    }

    async fn apply(&self, _job_id: i64) -> Result<Application, ApiError> {
        self.next("apply", &self.applied).await
    }

    async fn application_detail(&self, _id: i64) -> Result<ApplicationDetail, ApiError> {
        self.next("application_detail", &self.details).await
    }

    async fn advance_application(&self, _id: i64, action: AdvanceAction) -> Result<MessageResponse, ApiError> {
        self.next(&format!("advance:{}", action.as_str()), &self.advanced).await
    }

    async fn signup_applicant(&self, _form: &ApplicantSignup) -> Result<(), ApiError> {
        self.next("signup_applicant", &self.signups).await
    }

    async fn signup_recruiter(&self, _form: &RecruiterSignup) -> Result<(), ApiError> {
        self.next("signup_recruiter", &self.signups).await
    }

    async fn schedule_interview(&self, _token: Uuid, _slot: &InterviewSlot) -> Result<MessageResponse, ApiError> {
        self.next("schedule_interview", &self.schedules).await
    }
}

impl MockApi {
    /// Forget recorded calls, e.g. after a scripted login.
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

// =============================================================================
// SESSIONS
// =============================================================================

/// A session signed in as `user_type` through `api`. The login calls are
/// consumed from the queues and cleared from the call log.
pub async fn signed_in_session(api: &Arc<MockApi>, user_type: &str) -> Arc<SessionStore> {
    MockApi::push(&api.token, Ok(tokens()));
    MockApi::push(&api.profile, Ok(profile(user_type)));
    let session = Arc::new(SessionStore::new(api.clone(), Arc::new(MemoryTokenStorage::new())));
    session.login(&format!("{user_type}@example.com"), "pw").await.unwrap();
    api.reset_calls();
    session
}

/// A session with nobody signed in and the restore finished.
pub async fn signed_out_session(api: &Arc<MockApi>) -> Arc<SessionStore> {
    let session = Arc::new(SessionStore::new(api.clone(), Arc::new(MemoryTokenStorage::new())));
    session.restore().await;
    session
}
