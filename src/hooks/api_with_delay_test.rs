use super::*;
use crate::net::ApiErrorKind;
use crate::net::error::Endpoint;
use tokio::time::Instant;

fn failure() -> ApiError {
    ApiError::from_response(Endpoint::Authenticated, 400, r#"{"job":["already applied"]}"#)
}

// =============================================================================
// latency floor
// =============================================================================

#[tokio::test(start_paused = true)]
async fn instant_success_waits_for_floor() {
    let hook = ApiWithDelay::default();
    let start = Instant::now();
    let value = hook.execute(|| async { Ok(7) }).await.unwrap();
    assert_eq!(value, 7);
    assert!(start.elapsed() >= Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn slow_success_is_not_extended_past_operation() {
    let hook = ApiWithDelay::default();
    let start = Instant::now();
    hook.execute(|| async {
        tokio::time::sleep(Duration::from_millis(5000)).await;
        Ok(())
    })
    .await
    .unwrap();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(5000));
    assert!(elapsed < Duration::from_millis(5100), "floor must not add to a slow call: {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn failure_surfaces_without_waiting_for_floor() {
    let hook = ApiWithDelay::default();
    let start = Instant::now();
    let err = hook.execute(|| async { Err::<(), _>(failure()) }).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::ValidationRejected);
    assert!(start.elapsed() < Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn custom_floor_is_honored() {
    let hook = ApiWithDelay::new(Duration::from_millis(250));
    let start = Instant::now();
    hook.execute(|| async { Ok(()) }).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(250));
    assert!(start.elapsed() < Duration::from_millis(2000));
}

// =============================================================================
// loading / error state
// =============================================================================

#[tokio::test(start_paused = true)]
async fn loading_set_synchronously_and_cleared_on_success() {
    let hook = ApiWithDelay::default();
    assert!(!hook.loading());

    let pending = hook.execute(|| async { Ok(()) });
    assert!(hook.loading());

    pending.await.unwrap();
    assert!(!hook.loading());
    assert_eq!(hook.error(), None);
}

#[tokio::test(start_paused = true)]
async fn loading_cleared_and_error_recorded_on_failure() {
    let hook = ApiWithDelay::default();
    let pending = hook.execute(|| async { Err::<(), _>(failure()) });
    assert!(hook.loading());

    pending.await.unwrap_err();
    assert_eq!(
        hook.state(),
        PendingOperation { loading: false, error: Some(r#"{"job":["already applied"]}"#.to_owned()) }
    );
}

#[tokio::test(start_paused = true)]
async fn error_without_payload_uses_generic_message() {
    let hook = ApiWithDelay::default();
    hook.execute(|| async { Err::<(), _>(ApiError::new(ApiErrorKind::RequestFailed, "refused")) })
        .await
        .unwrap_err();
    assert_eq!(hook.error().as_deref(), Some(crate::net::error::GENERIC_ERROR_MESSAGE));
}

#[tokio::test(start_paused = true)]
async fn new_invocation_resets_error() {
    let hook = ApiWithDelay::default();
    hook.execute(|| async { Err::<(), _>(failure()) }).await.unwrap_err();
    assert!(hook.error().is_some());

    let pending = hook.execute(|| async { Ok(()) });
    assert_eq!(hook.state(), PendingOperation { loading: true, error: None });
    pending.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn dropping_unfinished_call_clears_loading() {
    let hook = ApiWithDelay::default();
    let pending = hook.execute(|| async { Ok(()) });
    assert!(hook.loading());
    drop(pending);
    assert!(!hook.loading());

    // The hook is usable again.
    hook.execute(|| async { Ok(()) }).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_transitions() {
    let hook = ApiWithDelay::default();
    let mut rx = hook.subscribe();

    let pending = hook.execute(|| async { Ok(()) });
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().loading);

    pending.await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert!(!rx.borrow_and_update().loading);
}

// =============================================================================
// overlapping calls
// =============================================================================

#[tokio::test(start_paused = true)]
async fn overlapping_call_is_refused_without_touching_state() {
    let hook = ApiWithDelay::default();
    let first = hook.execute(|| async { Ok(1) });

    let mut invoked = false;
    let second = hook
        .execute(|| {
            invoked = true;
            async { Ok(2) }
        })
        .await;
    assert_eq!(second.unwrap_err().kind, ApiErrorKind::Busy);
    assert!(!invoked);
    assert_eq!(hook.state(), PendingOperation { loading: true, error: None });

    assert_eq!(first.await.unwrap(), 1);
    assert!(!hook.loading());
}

#[tokio::test(start_paused = true)]
async fn clones_share_state() {
    let hook = ApiWithDelay::default();
    let view = hook.clone();
    let pending = hook.execute(|| async { Ok(()) });
    assert!(view.loading());
    pending.await.unwrap();
    assert!(!view.loading());
}
