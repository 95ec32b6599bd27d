//! Networking: wire types, the typed error boundary, and the REST client.

pub mod api;
pub mod error;
pub mod types;

pub use api::{ApiClient, JratsApi};
pub use error::{ApiError, ApiErrorKind};
