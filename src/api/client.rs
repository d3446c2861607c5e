//! Client for the remote authentication service.
//!
//! This module provides the `AuthClient` struct for performing credential
//! exchange: login, registration, token refresh, logout notification, and
//! profile/password maintenance. Each call is a single fire - no retries,
//! no caching - and every failure is normalized into `ApiError`.

use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{AuthUser, ChangePassword, LoginCredentials, ProfileUpdate, RegisterData};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Wire types
// ============================================================================

/// Successful login payload. Token fields are camelCase on the wire.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    pub user: AuthUser,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub user: AuthUser,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

// ============================================================================
// Client
// ============================================================================

/// Transport for the auth service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a new auth client against the given base URL
    /// (e.g. `https://shop.example.com/api/auth`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange username/password for a token pair and profile.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        let url = self.url("/login");
        self.execute(&url, self.client.post(&url).json(credentials))
            .await
    }

    /// Create a new account. Does not log the account in.
    pub async fn register(&self, data: &RegisterData) -> Result<RegisterResponse, ApiError> {
        let url = self.url("/register");
        self.execute(&url, self.client.post(&url).json(data)).await
    }

    /// Trade a refresh token for a fresh access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        let url = self.url("/refresh-token");
        let body = RefreshRequest { refresh_token };
        self.execute(&url, self.client.post(&url).json(&body)).await
    }

    /// Tell the server to invalidate the current access token.
    pub async fn logout(&self, token: &str) -> Result<MessageResponse, ApiError> {
        let url = self.url("/logout");
        self.execute(&url, self.client.post(&url).bearer_auth(token))
            .await
    }

    /// Fetch the current user's profile.
    pub async fn get_profile(&self, token: &str) -> Result<ProfileResponse, ApiError> {
        let url = self.url("/profile");
        self.execute(&url, self.client.get(&url).bearer_auth(token))
            .await
    }

    /// Apply a partial profile update.
    pub async fn update_profile(
        &self,
        token: &str,
        data: &ProfileUpdate,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.url("/profile");
        self.execute(&url, self.client.put(&url).bearer_auth(token).json(data))
            .await
    }

    /// Change the current user's password.
    pub async fn change_password(
        &self,
        token: &str,
        data: &ChangePassword,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.url("/change-password");
        self.execute(&url, self.client.post(&url).bearer_auth(token).json(data))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fire a request and normalize the outcome: non-success statuses become
    /// `ApiError::Status` with the server's message, transport failures
    /// become `ApiError::Network`, bad success bodies `ApiError::InvalidResponse`.
    async fn execute<T: DeserializeOwned>(
        &self,
        url: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(%url, "auth request");

        let response = request.send().await.map_err(ApiError::Network)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::Network)?;
        debug!(%url, %status, "auth response");

        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }

        serde_json::from_str(&body).map_err(ApiError::InvalidResponse)
    }
}
