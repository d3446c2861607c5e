//! Stockgate session layer - authentication and route access control for
//! the Stockgate business-management client.
//!
//! This crate owns credential exchange against the remote auth service,
//! durable token/profile persistence, the in-memory session state machine,
//! and the per-navigation route guard. Host applications embed it and keep
//! all UI concerns to themselves.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiError, AuthClient};
pub use auth::{
    AuthError, CredentialStore, LoginForm, RouteDecision, SessionManager, SessionState,
};
pub use config::Config;
pub use models::{AuthUser, ChangePassword, LoginCredentials, ProfileUpdate, RegisterData};
