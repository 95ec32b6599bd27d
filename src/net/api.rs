//! REST client for the JRATS API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages and the session store talk to the server only through the
//! [`JratsApi`] trait. [`ApiClient`] is the HTTP implementation: it reads
//! the access token from [`TokenStorage`] on every authenticated request and
//! attaches it as a bearer header. Nothing else is added; there are no
//! retries and no timeouts beyond reqwest's defaults.
//!
//! ERROR HANDLING
//! ==============
//! Every failure leaves this module as an [`ApiError`]; callers never see
//! `reqwest` or `serde_json` errors.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};
use uuid::Uuid;

use super::error::{ApiError, ApiErrorKind, Endpoint};
use super::types::{
    AdvanceAction, AdvanceRequest, Application, ApplicationDetail, ApplicantSignup, Credentials, InterviewSlot, Job,
    MessageResponse, NewApplication, NewJob, RecruiterSignup, TokenPair, UserProfile,
};
use crate::util::storage::TokenStorage;

// =============================================================================
// ENDPOINTS
// =============================================================================

pub(crate) const TOKEN_PATH: &str = "/token/";
pub(crate) const PROFILE_PATH: &str = "/profile/me/";
pub(crate) const JOBS_PATH: &str = "/jobs/";
pub(crate) const APPLICATIONS_PATH: &str = "/applications/";
pub(crate) const APPLICANT_SIGNUP_PATH: &str = "/signup/applicant/";
pub(crate) const RECRUITER_SIGNUP_PATH: &str = "/signup/recruiter/";

fn application_path(id: i64) -> String {
    format!("/applications/{id}/")
}

fn advance_path(id: i64) -> String {
    format!("/applications/{id}/advance/")
}

fn schedule_path(token: Uuid) -> String {
    format!("/interview/schedule/{token}/")
}

// =============================================================================
// TRAIT
// =============================================================================

/// Remote operations the client depends on.
#[async_trait::async_trait]
pub trait JratsApi: Send + Sync {
    /// `POST /token/`: exchange credentials for a token pair.
    async fn obtain_token(&self, credentials: &Credentials) -> Result<TokenPair, ApiError>;

    /// `GET /profile/me/` with the stored access token.
    async fn current_profile(&self) -> Result<UserProfile, ApiError>;

    /// `GET /jobs/`.
    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError>;

    /// `POST /jobs/` (recruiters only).
    async fn create_job(&self, job: &NewJob) -> Result<Job, ApiError>;

    /// `GET /applications/`: own applications, or those for the recruiter's jobs.
    async fn list_applications(&self) -> Result<Vec<Application>, ApiError>;

    /// `POST /applications/`: apply to a job.
    async fn apply(&self, job_id: i64) -> Result<Application, ApiError>;

    /// `GET /applications/{id}/`.
    async fn application_detail(&self, id: i64) -> Result<ApplicationDetail, ApiError>;

    /// `POST /applications/{id}/advance/`.
    async fn advance_application(&self, id: i64, action: AdvanceAction) -> Result<MessageResponse, ApiError>;

    /// `POST /signup/applicant/` (multipart).
    async fn signup_applicant(&self, form: &ApplicantSignup) -> Result<(), ApiError>;

    /// `POST /signup/recruiter/` (multipart).
    async fn signup_recruiter(&self, form: &RecruiterSignup) -> Result<(), ApiError>;

    /// `POST /interview/schedule/{token}/`.
    async fn schedule_interview(&self, token: Uuid, slot: &InterviewSlot) -> Result<MessageResponse, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// reqwest-backed [`JratsApi`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<dyn TokenStorage>,
}

impl ApiClient {
    /// Build a client rooted at `base_url` (e.g. `http://127.0.0.1:8000/api`).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str, storage: Arc<dyn TokenStorage>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("jrats/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::transport(&e))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned(), storage })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn public(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Request with the stored access token attached. Without a token the
    /// call fails locally as `SessionInvalid`; the server would reject it
    /// the same way.
    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self
            .storage
            .access_token()
            .ok_or_else(|| ApiError::new(ApiErrorKind::SessionInvalid, "not signed in"))?;
        Ok(self.public(method, path).bearer_auth(token))
    }

    async fn send_raw(&self, endpoint: Endpoint, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "api request failed before a response");
            ApiError::transport(&e)
        })?;

        let status = response.status();
        let url = response.url().path().to_owned();
        let body = response.text().await.map_err(|e| ApiError::transport(&e))?;
        tracing::debug!(path = %url, status = status.as_u16(), "api response");

        if !status.is_success() {
            return Err(ApiError::from_response(endpoint, status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(&self, endpoint: Endpoint, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(endpoint, request).await?;
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text)
        .map_err(|e| ApiError::new(ApiErrorKind::RequestFailed, format!("unexpected response body: {e}")))
}

fn applicant_form(form: &ApplicantSignup) -> Form {
    let mut multipart = Form::new()
        .text("user.username", form.username.clone())
        .text("user.email", form.email.clone())
        .text("user.password", form.password.clone())
        .text("skills", form.skills.clone());
    if let Some(resume) = &form.resume {
        multipart = multipart.part("resume", Part::bytes(resume.bytes.clone()).file_name(resume.file_name.clone()));
    }
    multipart
}

fn recruiter_form(form: &RecruiterSignup) -> Form {
    Form::new()
        .text("user.username", form.username.clone())
        .text("user.email", form.email.clone())
        .text("user.password", form.password.clone())
        .text("company_name", form.company_name.clone())
}

#[async_trait::async_trait]
impl JratsApi for ApiClient {
    async fn obtain_token(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        let request = self.public(Method::POST, TOKEN_PATH).json(credentials);
        self.send(Endpoint::Token, request).await
    }

    async fn current_profile(&self) -> Result<UserProfile, ApiError> {
        let request = self.authed(Method::GET, PROFILE_PATH)?;
        self.send(Endpoint::Authenticated, request).await
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let request = self.authed(Method::GET, JOBS_PATH)?;
        self.send(Endpoint::Authenticated, request).await
    }

    async fn create_job(&self, job: &NewJob) -> Result<Job, ApiError> {
        let request = self.authed(Method::POST, JOBS_PATH)?.json(job);
        self.send(Endpoint::Authenticated, request).await
    }

    async fn list_applications(&self) -> Result<Vec<Application>, ApiError> {
        let request = self.authed(Method::GET, APPLICATIONS_PATH)?;
        self.send(Endpoint::Authenticated, request).await
    }

    async fn apply(&self, job_id: i64) -> Result<Application, ApiError> {
        let request = self.authed(Method::POST, APPLICATIONS_PATH)?.json(&NewApplication { job: job_id });
        self.send(Endpoint::Authenticated, request).await
    }

    async fn application_detail(&self, id: i64) -> Result<ApplicationDetail, ApiError> {
        let request = self.authed(Method::GET, &application_path(id))?;
        self.send(Endpoint::Authenticated, request).await
    }

    async fn advance_application(&self, id: i64, action: AdvanceAction) -> Result<MessageResponse, ApiError> {
        let request = self.authed(Method::POST, &advance_path(id))?.json(&AdvanceRequest { action });
        let response: Option<MessageResponse> = self.send(Endpoint::Authenticated, request).await?;
        Ok(response.unwrap_or_default())
    }

    async fn signup_applicant(&self, form: &ApplicantSignup) -> Result<(), ApiError> {
        let request = self.public(Method::POST, APPLICANT_SIGNUP_PATH).multipart(applicant_form(form));
        self.send::<IgnoredAny>(Endpoint::Public, request).await?;
        Ok(())
    }

    async fn signup_recruiter(&self, form: &RecruiterSignup) -> Result<(), ApiError> {
        let request = self.public(Method::POST, RECRUITER_SIGNUP_PATH).multipart(recruiter_form(form));
        self.send::<IgnoredAny>(Endpoint::Public, request).await?;
        Ok(())
    }

    async fn schedule_interview(&self, token: Uuid, slot: &InterviewSlot) -> Result<MessageResponse, ApiError> {
        let request = self.public(Method::POST, &schedule_path(token)).json(slot);
        let response: Option<MessageResponse> = self.send(Endpoint::Public, request).await?;
        Ok(response.unwrap_or_default())
    }
}
