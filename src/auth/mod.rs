//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `CredentialStore`: durable token/profile persistence scoped to a directory
//! - `SessionManager`: the in-memory session state machine and its operations
//! - `RouteDecision`/`decide`: the per-navigation route guard
//! - `LoginForm`: the login-screen entry point
//!
//! Tokens and the cached profile survive restarts; the session itself is
//! always re-derived from the store at startup.

pub mod guard;
pub mod login;
pub mod session;
pub mod store;

pub use guard::{decide, RouteDecision, LOGIN_PATH};
pub use login::LoginForm;
pub use session::{AuthError, SessionManager, SessionState};
pub use store::CredentialStore;
