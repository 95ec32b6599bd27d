//! Wire DTOs for the JRATS REST API.
//!
//! DESIGN
//! ======
//! These types mirror the server's serializer payloads so serde round-trips
//! stay lossless. Anything the client only displays (timestamps, resume
//! paths) stays a plain string.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// =============================================================================
// AUTH
// =============================================================================

/// Credentials exchanged at `POST /token/`.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Access/refresh bearer token pair returned by `POST /token/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Role discriminator used for route authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserType {
    Recruiter,
    Applicant,
}

impl UserType {
    /// Wire value of this role (`"recruiter"` / `"applicant"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recruiter => "recruiter",
            Self::Applicant => "applicant",
        }
    }

    /// Parse a wire `user_type`. Unknown values yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "recruiter" => Some(Self::Recruiter),
            "applicant" => Some(Self::Applicant),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recruiter-specific profile fields nested in `/profile/me/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecruiterProfile {
    pub company_name: String,
}

/// Applicant-specific profile fields nested in `/profile/me/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    /// Server-relative path of the uploaded resume.
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub skills: String,
}

/// The authenticated user as returned by `GET /profile/me/`.
///
/// Replaced wholesale on every fetch; never patched in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// `"recruiter"` or `"applicant"`; kept raw so unknown roles survive.
    pub user_type: String,
    #[serde(default)]
    pub recruiter_profile: Option<RecruiterProfile>,
    #[serde(default)]
    pub applicant_profile: Option<ApplicantProfile>,
}

impl UserProfile {
    /// Parsed role, `None` when the server sent something unrecognized.
    #[must_use]
    pub fn role(&self) -> Option<UserType> {
        UserType::parse(&self.user_type)
    }

    #[must_use]
    pub fn is_recruiter(&self) -> bool {
        self.role() == Some(UserType::Recruiter)
    }
}

// =============================================================================
// SIGNUP
// =============================================================================

/// Resume file attached to an applicant signup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Multipart body for `POST /signup/applicant/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplicantSignup {
    pub username: String,
    pub email: String,
    pub password: String,
    pub skills: String,
    pub resume: Option<ResumeUpload>,
}

/// Multipart body for `POST /signup/recruiter/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecruiterSignup {
    pub username: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
}

// =============================================================================
// JOBS
// =============================================================================

/// A posted job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body for `POST /jobs/`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub location: String,
}

// =============================================================================
// APPLICATIONS
// =============================================================================

/// Review stage of an application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    Reviewed,
    /// Applicant has picked a time.
    InterviewScheduled,
    /// Recruiter has invited; applicant still needs to schedule.
    InterviewPending,
    Interview,
    Offered,
    Rejected,
}

/// Visual grouping used by status badges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusBadge {
    Submitted,
    Rejected,
    Interview,
    Other,
}

impl ApplicationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Reviewed => "reviewed",
            Self::InterviewScheduled => "interview_scheduled",
            Self::InterviewPending => "interview_pending",
            Self::Interview => "interview",
            Self::Offered => "offered",
            Self::Rejected => "rejected",
        }
    }

    /// Human label: the wire value with underscores turned into spaces.
    #[must_use]
    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }

    #[must_use]
    pub fn badge(self) -> StatusBadge {
        match self {
            Self::Submitted => StatusBadge::Submitted,
            Self::Rejected => StatusBadge::Rejected,
            Self::InterviewScheduled | Self::InterviewPending | Self::Interview => StatusBadge::Interview,
            Self::Reviewed | Self::Offered => StatusBadge::Other,
        }
    }

    /// Whether a recruiter may still invite or reject.
    #[must_use]
    pub fn is_reviewable(self) -> bool {
        matches!(self, Self::Submitted | Self::Reviewed)
    }
}

/// List form of an application; `job` and `applicant` are ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub job: i64,
    pub applicant: i64,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub applied_at: Option<String>,
}

/// Body for `POST /applications/`.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct NewApplication {
    pub job: i64,
}

/// Applicant identity nested in an application detail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplicantUser {
    pub username: String,
    pub email: String,
}

/// Applicant profile nested in an application detail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplicantSummary {
    pub user: ApplicantUser,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub skills: String,
}

/// Detailed application from `GET /applications/{id}/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDetail {
    pub id: i64,
    pub job: Job,
    pub applicant: ApplicantSummary,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub applied_at: Option<String>,
}

/// Recruiter decision for `POST /applications/{id}/advance/`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvanceAction {
    Invite,
    Reject,
}

impl AdvanceAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invite => "invite",
            Self::Reject => "reject",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
pub(crate) struct AdvanceRequest {
    pub action: AdvanceAction,
}

// =============================================================================
// INTERVIEWS
// =============================================================================

/// Body for `POST /interview/schedule/{token}/`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct InterviewSlot {
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_time: OffsetDateTime,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}
