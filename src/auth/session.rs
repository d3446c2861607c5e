//! In-memory session state and the operations that mutate it.
//!
//! `SessionManager` owns the credential store and the auth transport; it is
//! the only writer of the store after hydration. Every persisted write
//! completes before the in-memory state is updated to match, so the session
//! never claims authentication that the store cannot back up after a reload.
//!
//! Overlapping login calls are not deduplicated; the last completed write
//! wins. None of the operations support mid-flight cancellation.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiError, AuthClient};
use crate::models::{AuthUser, LoginCredentials};

use super::guard::{self, RouteDecision};
use super::store::CredentialStore;

/// Session-level failures surfaced to callers. Login and refresh failures
/// are returned values, never panics.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The auth service rejected the login; carries the server's message.
    #[error("{0}")]
    CredentialsInvalid(String),

    /// The auth service could not be reached or answered unintelligibly.
    #[error("{0}")]
    NetworkFailure(String),

    /// No refresh path remains; the session has been logged out.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Credentials could not be persisted locally.
    #[error("Failed to save credentials: {0}")]
    Storage(String),
}

/// Lifecycle states of the session. The machine cycles for the lifetime of
/// the application; there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Before the first `hydrate` call
    Unknown,
    /// No valid credentials
    Anonymous,
    /// A login call is in flight
    Authenticating,
    /// Valid credentials present
    Authenticated,
}

pub struct SessionManager {
    api: AuthClient,
    store: CredentialStore,
    state: SessionState,
    user: Option<AuthUser>,
    loading: bool,
}

impl SessionManager {
    pub fn new(api: AuthClient, store: CredentialStore) -> Self {
        Self {
            api,
            store,
            state: SessionState::Unknown,
            user: None,
            loading: false,
        }
    }

    /// Rebuild the in-memory session from the credential store. Called once
    /// at startup; calling it again is harmless and re-derives the same state.
    pub fn hydrate(&mut self) {
        let token = self.store.access_token();
        let user = self.store.user();

        match (token, user) {
            (Some(_), Some(user)) => {
                debug!(username = %user.username, "Session hydrated from store");
                self.user = Some(user);
                self.state = SessionState::Authenticated;
            }
            _ => {
                debug!("No stored session found");
                self.user = None;
                self.state = SessionState::Anonymous;
            }
        }
        self.loading = false;
    }

    /// Exchange credentials for a session. On success both tokens and the
    /// profile are persisted before the in-memory state flips to
    /// authenticated. On failure the store is left untouched and the error
    /// carries a message fit for display; nothing is thrown.
    pub async fn login(&mut self, credentials: &LoginCredentials) -> Result<AuthUser, AuthError> {
        self.loading = true;
        self.state = SessionState::Authenticating;

        let result = self.perform_login(credentials).await;

        // Reset on both paths, success or failure
        self.loading = false;

        match result {
            Ok(user) => {
                info!(username = %user.username, "Login successful");
                self.user = Some(user.clone());
                self.state = SessionState::Authenticated;
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.user = None;
                self.state = SessionState::Anonymous;
                Err(e)
            }
        }
    }

    async fn perform_login(&self, credentials: &LoginCredentials) -> Result<AuthUser, AuthError> {
        let response = self.api.login(credentials).await.map_err(|e| match e {
            ApiError::Status { message, .. } => AuthError::CredentialsInvalid(message),
            other => AuthError::NetworkFailure(other.to_string()),
        })?;

        // Persist before updating memory so a reload cannot observe an
        // authenticated session the store cannot reproduce.
        self.store
            .set_tokens(&response.access_token, &response.refresh_token)
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        self.store
            .set_user(&response.user)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        Ok(response.user)
    }

    /// End the session. The server notification is best-effort; local state
    /// is cleared no matter what the network does, so logout always
    /// succeeds from the caller's point of view.
    pub async fn logout(&mut self) {
        if let Some(token) = self.store.access_token() {
            if let Err(e) = self.api.logout(&token).await {
                debug!(error = %e, "Logout notification failed, clearing local state anyway");
            }
        }

        if let Err(e) = self.store.clear_all() {
            warn!(error = %e, "Failed to clear credential store during logout");
        }

        self.user = None;
        self.state = SessionState::Anonymous;
        info!("Logged out");
    }

    /// Rotate the access token using the stored refresh token. Any failure
    /// along the way (missing refresh token, rejected refresh, persistence
    /// failure) performs a full logout so a stale access token is never left
    /// behind without a working refresh path.
    pub async fn refresh_session(&mut self) -> Result<(), AuthError> {
        let Some(refresh_token) = self.store.refresh_token() else {
            debug!("No refresh token stored, logging out");
            self.logout().await;
            return Err(AuthError::SessionExpired);
        };

        let response = match self.api.refresh_token(&refresh_token).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Token refresh rejected, logging out");
                self.logout().await;
                return Err(AuthError::SessionExpired);
            }
        };

        if let Err(e) = self.store.set_access_token(&response.access_token) {
            warn!(error = %e, "Failed to persist rotated access token, logging out");
            self.logout().await;
            return Err(AuthError::SessionExpired);
        }

        debug!("Access token rotated");
        Ok(())
    }

    /// Route-guard decision for the current session state.
    pub fn route(&self, path: &str) -> RouteDecision {
        guard::decide(self.is_authenticated(), path)
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The underlying store, exposed for collaborators that attach the
    /// access token to business-data requests.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }
}
