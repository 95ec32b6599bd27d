//! Reusable async helpers for page models.

pub mod api_with_delay;

pub use api_with_delay::{ApiWithDelay, DEFAULT_MIN_LATENCY, PendingOperation};
