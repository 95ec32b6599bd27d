use super::*;
use std::time::Duration;

use time::macros::datetime;

use crate::net::ApiErrorKind;
use crate::net::error::Endpoint;
use crate::net::types::MessageResponse;
use crate::test_helpers::{self, MockApi};

const TOKEN: &str = "6f1c1b2e-8f4a-4a53-9a7e-1d2c3b4a5f60";
const AT: OffsetDateTime = datetime!(2026-11-02 14:30 UTC);

fn page(api: &Arc<MockApi>, token: &str) -> InterviewSchedulerPage {
    InterviewSchedulerPage::new(api.clone(), ApiWithDelay::new(Duration::from_millis(2000)), token)
}

#[tokio::test(start_paused = true)]
async fn success_uses_server_message() {
    let api = Arc::new(MockApi::new());
    MockApi::push(&api.schedules, Ok(MessageResponse { message: Some("See you then.".into()) }));
    let page = page(&api, TOKEN);

    assert_eq!(page.submit(AT).await.unwrap(), "See you then.");

    assert_eq!(page.view().message.as_deref(), Some("See you then."));
    assert!(!page.shows_form());
}

#[tokio::test(start_paused = true)]
async fn success_without_message_uses_default() {
    let api = Arc::new(MockApi::new());
    MockApi::push(&api.schedules, Ok(MessageResponse::default()));
    let page = page(&api, TOKEN);

    assert_eq!(page.submit(AT).await.unwrap(), SCHEDULED);
}

#[tokio::test(start_paused = true)]
async fn failure_prefers_server_error_field() {
    let api = Arc::new(MockApi::new());
    MockApi::push(
        &api.schedules,
        Err(test_helpers::http_error(Endpoint::Public, 400, r#"{"error":"This time slot is already booked."}"#)),
    );
    let page = page(&api, TOKEN);

    page.submit(AT).await.unwrap_err();

    let view = page.view();
    assert_eq!(view.error.as_deref(), Some("This time slot is already booked."));
    assert_eq!(view.message, None);
    assert!(page.shows_form());
}

#[tokio::test(start_paused = true)]
async fn failure_without_error_field_uses_fallback() {
    let api = Arc::new(MockApi::new());
    MockApi::push(&api.schedules, Err(test_helpers::http_error(Endpoint::Public, 404, r#"{"detail":"Not found."}"#)));
    let page = page(&api, TOKEN);

    page.submit(AT).await.unwrap_err();

    assert_eq!(page.view().error.as_deref(), Some(SCHEDULE_FAILED));
}

#[tokio::test]
async fn malformed_token_fails_without_request() {
    let api = Arc::new(MockApi::new());
    let page = page(&api, "not-a-uuid");

    let err = page.submit(AT).await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::ValidationRejected);
    assert_eq!(page.view().error.as_deref(), Some(SCHEDULE_FAILED));
    assert_eq!(api.call_count(), 0);
}

#[test]
fn parse_slot_accepts_rfc3339() {
    assert_eq!(parse_slot("2026-11-02T14:30:00Z").unwrap(), AT);
    assert_eq!(parse_slot("2026-11-02T16:30:00+02:00").unwrap(), AT);
}

#[test]
fn parse_slot_rejects_local_times() {
    assert_eq!(parse_slot("2026-11-02 14:30").unwrap_err().kind, ApiErrorKind::ValidationRejected);
}
