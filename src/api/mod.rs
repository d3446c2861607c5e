//! Auth transport module for the remote authentication service.
//!
//! This module provides the `AuthClient` for exchanging credentials with
//! the auth endpoints (login, refresh, logout, profile, password) and the
//! `ApiError` type that normalizes every failure into a single
//! human-readable error kind.
//!
//! Authenticated operations use JWT bearer tokens issued by the login
//! endpoint; the transport itself holds no token state.

pub mod client;
pub mod error;

pub use client::{
    AuthClient, LoginResponse, MessageResponse, ProfileResponse, RefreshResponse,
    RegisterResponse,
};
pub use error::ApiError;
