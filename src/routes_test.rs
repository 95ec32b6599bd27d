use super::*;
use std::sync::Arc;

use crate::state::auth::SessionStore;
use crate::test_helpers::{self, MockApi};
use crate::util::storage::MemoryTokenStorage;

fn signed_in(user_type: &str) -> AuthState {
    AuthState::signed_in(test_helpers::profile(user_type))
}

// =============================================================================
// resolve
// =============================================================================

#[test]
fn everything_pends_while_restoring() {
    for path in ["/", "/login", "/jobs", "/interview/schedule/abc", "/nope"] {
        assert_eq!(resolve(path, &AuthState::restoring()), Navigation::Pending, "{path}");
    }
}

#[test]
fn unauthenticated_jobs_redirects_to_login() {
    assert_eq!(resolve("/jobs", &AuthState::signed_out()), Navigation::Redirect("/login"));
}

#[test]
fn applicant_on_recruiter_dashboard_goes_home() {
    assert_eq!(resolve("/recruiter/dashboard", &signed_in("applicant")), Navigation::Redirect("/"));
}

#[test]
fn root_sends_recruiter_to_recruiter_landing() {
    assert_eq!(resolve("/", &signed_in("recruiter")), Navigation::Redirect("/recruiter/dashboard"));
}

#[test]
fn root_without_user_goes_to_login() {
    assert_eq!(resolve("/", &AuthState::signed_out()), Navigation::Redirect("/login"));
}

#[test]
fn login_and_signup_are_public_only() {
    assert_eq!(resolve("/login", &AuthState::signed_out()), Navigation::Render(Page::Login));
    assert_eq!(resolve("/signup", &AuthState::signed_out()), Navigation::Render(Page::Signup));
    assert_eq!(resolve("/login", &signed_in("applicant")), Navigation::Redirect("/"));
    assert_eq!(resolve("/signup", &signed_in("recruiter")), Navigation::Redirect("/"));
}

#[test]
fn interview_scheduler_is_open_to_everyone() {
    let expected = Navigation::Render(Page::InterviewScheduler { token: "tok-1".into() });
    assert_eq!(resolve("/interview/schedule/tok-1", &AuthState::signed_out()), expected);
    assert_eq!(resolve("/interview/schedule/tok-1/", &signed_in("applicant")), expected);
}

#[test]
fn matching_roles_render_dashboards() {
    assert_eq!(resolve("/recruiter/dashboard", &signed_in("recruiter")), Navigation::Render(Page::RecruiterDashboard));
    assert_eq!(resolve("/applicant/dashboard", &signed_in("applicant")), Navigation::Render(Page::ApplicantDashboard));
    assert_eq!(resolve("/jobs", &signed_in("recruiter")), Navigation::Render(Page::AllJobs));
}

#[test]
fn unknown_paths_are_not_found() {
    assert_eq!(resolve("/admin", &signed_in("recruiter")), Navigation::Render(Page::NotFound));
    assert_eq!(resolve("/interview/schedule/", &AuthState::signed_out()), Navigation::Render(Page::NotFound));
    assert_eq!(resolve("/interview/schedule/a/b", &AuthState::signed_out()), Navigation::Render(Page::NotFound));
}

#[test]
fn query_and_trailing_slash_are_ignored() {
    assert_eq!(resolve("/jobs/?page=2", &signed_in("applicant")), Navigation::Render(Page::AllJobs));
    assert_eq!(resolve("", &AuthState::signed_out()), Navigation::Redirect("/login"));
}

// =============================================================================
// follow
// =============================================================================

#[test]
fn follow_chases_role_mismatch_to_own_dashboard() {
    let dest = follow("/recruiter/dashboard", &signed_in("applicant")).unwrap();
    assert_eq!(dest, Destination { path: "/applicant/dashboard".into(), page: Page::ApplicantDashboard });
}

#[test]
fn follow_signed_out_root_lands_on_login() {
    let dest = follow("/", &AuthState::signed_out()).unwrap();
    assert_eq!(dest.page, Page::Login);
    assert_eq!(dest.path, "/login");
}

#[test]
fn follow_signed_in_login_lands_on_dashboard() {
    let dest = follow("/login", &signed_in("recruiter")).unwrap();
    assert_eq!(dest.page, Page::RecruiterDashboard);
}

#[test]
fn follow_pending_is_none() {
    assert_eq!(follow("/jobs", &AuthState::restoring()), None);
}

// =============================================================================
// spawn_route_watcher
// =============================================================================

#[tokio::test]
async fn watcher_recomputes_on_every_session_change() {
    let api = Arc::new(MockApi::new());
    MockApi::push(&api.token, Ok(test_helpers::tokens()));
    MockApi::push(&api.profile, Ok(test_helpers::profile("applicant")));
    let session = SessionStore::new(api.clone(), Arc::new(MemoryTokenStorage::new()));

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let handle = spawn_route_watcher(session.subscribe(), "/jobs".into(), move |nav| {
        tx.send(nav).unwrap();
    });

    assert_eq!(rx.recv().await.unwrap(), Navigation::Pending);

    session.restore().await;
    assert_eq!(rx.recv().await.unwrap(), Navigation::Redirect("/login"));

    session.login("ada@example.com", "pw").await.unwrap();
    assert_eq!(rx.recv().await.unwrap(), Navigation::Render(Page::AllJobs));

    session.logout();
    assert_eq!(rx.recv().await.unwrap(), Navigation::Redirect("/login"));

    drop(session);
    handle.await.unwrap();
}
