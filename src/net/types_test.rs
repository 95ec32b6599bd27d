use super::*;
use time::macros::datetime;

#[test]
fn user_type_parse_known_roles() {
    assert_eq!(UserType::parse("recruiter"), Some(UserType::Recruiter));
    assert_eq!(UserType::parse("applicant"), Some(UserType::Applicant));
}

#[test]
fn user_type_parse_unknown_is_none() {
    assert_eq!(UserType::parse("admin"), None);
    assert_eq!(UserType::parse("Recruiter"), None);
}

#[test]
fn user_profile_deserializes_without_nested_profiles() {
    let json = serde_json::json!({
        "id": 7,
        "username": "ada",
        "email": "ada@example.com",
        "user_type": "applicant"
    });
    let profile: UserProfile = serde_json::from_value(json).unwrap();
    assert_eq!(profile.role(), Some(UserType::Applicant));
    assert!(!profile.is_recruiter());
    assert!(profile.recruiter_profile.is_none());
}

#[test]
fn user_profile_keeps_nested_recruiter_profile() {
    let json = serde_json::json!({
        "id": 1,
        "username": "rita",
        "email": "rita@example.com",
        "user_type": "recruiter",
        "recruiter_profile": { "user": { "username": "rita" }, "company_name": "Acme" },
        "applicant_profile": null
    });
    let profile: UserProfile = serde_json::from_value(json).unwrap();
    assert!(profile.is_recruiter());
    assert_eq!(profile.recruiter_profile.unwrap().company_name, "Acme");
}

#[test]
fn application_status_labels_replace_underscores() {
    assert_eq!(ApplicationStatus::InterviewPending.label(), "interview pending");
    assert_eq!(ApplicationStatus::Submitted.label(), "submitted");
}

#[test]
fn application_status_badges() {
    assert_eq!(ApplicationStatus::Submitted.badge(), StatusBadge::Submitted);
    assert_eq!(ApplicationStatus::Rejected.badge(), StatusBadge::Rejected);
    assert_eq!(ApplicationStatus::InterviewScheduled.badge(), StatusBadge::Interview);
    assert_eq!(ApplicationStatus::Interview.badge(), StatusBadge::Interview);
    assert_eq!(ApplicationStatus::Offered.badge(), StatusBadge::Other);
}

#[test]
fn only_submitted_and_reviewed_are_reviewable() {
    assert!(ApplicationStatus::Submitted.is_reviewable());
    assert!(ApplicationStatus::Reviewed.is_reviewable());
    assert!(!ApplicationStatus::InterviewPending.is_reviewable());
    assert!(!ApplicationStatus::Rejected.is_reviewable());
}

#[test]
fn application_list_item_parses_snake_case_status() {
    let json = serde_json::json!({
        "id": 3, "job": 9, "applicant": 4,
        "status": "interview_scheduled",
        "applied_at": "2025-01-02T10:00:00Z"
    });
    let app: Application = serde_json::from_value(json).unwrap();
    assert_eq!(app.status, ApplicationStatus::InterviewScheduled);
    assert_eq!(app.job, 9);
}

#[test]
fn advance_request_serializes_lowercase_action() {
    let body = serde_json::to_value(AdvanceRequest { action: AdvanceAction::Invite }).unwrap();
    assert_eq!(body, serde_json::json!({ "action": "invite" }));
}

#[test]
fn interview_slot_serializes_rfc3339() {
    let slot = InterviewSlot { scheduled_time: datetime!(2030-05-01 10:30 UTC) };
    let body = serde_json::to_value(slot).unwrap();
    assert_eq!(body["scheduled_time"], "2030-05-01T10:30:00Z");
}
