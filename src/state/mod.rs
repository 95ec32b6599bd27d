//! Client state shared across pages.

pub mod auth;

pub use auth::{AuthState, RestoreOutcome, SessionError, SessionStore};
