//! JRATS job-recruitment client.
//!
//! SYSTEM CONTEXT
//! ==============
//! A session store tracks who is signed in, a REST client talks to the
//! JRATS API with the stored bearer token, a delayed-execution hook gives
//! every page load a latency floor, and route gates decide which page a
//! path renders for the current session. The `jrats` binary drives all of
//! it from the command line.

pub mod config;
pub mod hooks;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_helpers;

pub use config::ClientConfig;
pub use hooks::ApiWithDelay;
pub use net::{ApiClient, ApiError, ApiErrorKind, JratsApi};
pub use state::{AuthState, SessionStore};
