//! Floor-latency wrapper for API calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages route their data loads and form submissions through
//! [`ApiWithDelay::execute`] so that fast responses do not flash the UI.
//! The hook owns the `{loading, error}` pair a page renders while a request
//! is pending.
//!
//! DESIGN
//! ======
//! The wrapped operation and a floor timer run concurrently via
//! `tokio::try_join!`: success waits for the later of the two, failure
//! short-circuits as soon as the operation rejects. State lives in a
//! `watch` channel so views can observe transitions.
//!
//! One call may be in flight per hook. An overlapping call is refused with
//! [`ApiErrorKind::Busy`](crate::net::ApiErrorKind::Busy) and does not
//! touch the in-flight call's state.

#[cfg(test)]
#[path = "api_with_delay_test.rs"]
mod tests;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;

use crate::net::ApiError;

/// Default perceived-latency floor.
pub const DEFAULT_MIN_LATENCY: Duration = Duration::from_millis(2000);

/// Observable state of one hook instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingOperation {
    pub loading: bool,
    pub error: Option<String>,
}

/// Delayed-execution hook. Cloning shares the same state.
#[derive(Clone)]
pub struct ApiWithDelay {
    inner: Arc<Inner>,
}

struct Inner {
    floor: Duration,
    state: watch::Sender<PendingOperation>,
    in_flight: AtomicBool,
}

impl Default for ApiWithDelay {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LATENCY)
    }
}

impl ApiWithDelay {
    #[must_use]
    pub fn new(floor: Duration) -> Self {
        let (state, _) = watch::channel(PendingOperation::default());
        Self { inner: Arc::new(Inner { floor, state, in_flight: AtomicBool::new(false) }) }
    }

    #[must_use]
    pub fn floor(&self) -> Duration {
        self.inner.floor
    }

    #[must_use]
    pub fn state(&self) -> PendingOperation {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    /// Receive every `{loading, error}` transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PendingOperation> {
        self.inner.state.subscribe()
    }

    /// Run `operation` with the latency floor.
    ///
    /// `loading` is set and `error` cleared before this returns, i.e. before
    /// the future is first polled. On success the future resolves once both
    /// the operation and the floor timer have finished. On failure it
    /// resolves as soon as the operation fails and `error` holds a display
    /// string. `loading` is cleared on settlement, including when the future
    /// is dropped unfinished.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or a `Busy` error if another call on
    /// this hook has not settled yet.
    pub fn execute<T, F, Fut>(&self, operation: F) -> impl Future<Output = Result<T, ApiError>> + use<T, F, Fut>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let floor = self.inner.floor;
        let started = self.begin().map(|guard| (guard, operation()));

        async move {
            let (guard, operation) = started?;
            let timer = async {
                tokio::time::sleep(floor).await;
                Ok::<(), ApiError>(())
            };

            match tokio::try_join!(operation, timer) {
                Ok((value, ())) => {
                    guard.settle(None);
                    Ok(value)
                }
                Err(e) => {
                    tracing::debug!(kind = ?e.kind, error = %e, "delayed operation failed");
                    guard.settle(Some(e.display_message()));
                    Err(e)
                }
            }
        }
    }

    fn begin(&self) -> Result<InFlight, ApiError> {
        if self.inner.in_flight.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
            tracing::debug!("refusing overlapping execute call");
            return Err(ApiError::busy());
        }
        self.inner.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        Ok(InFlight { inner: Arc::clone(&self.inner), settled: false })
    }
}

/// Clears `loading` exactly once, on settle or on drop.
struct InFlight {
    inner: Arc<Inner>,
    settled: bool,
}

impl InFlight {
    fn settle(mut self, error: Option<String>) {
        self.finish(error);
    }

    fn finish(&mut self, error: Option<String>) {
        if self.settled {
            return;
        }
        self.settled = true;
        self.inner.state.send_modify(|state| {
            state.loading = false;
            state.error = error;
        });
        self.inner.in_flight.store(false, Ordering::Release);
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.finish(None);
    }
}
