//! Domain types shared between the auth transport and the session layer.
//!
//! `AuthUser` mirrors the profile shape the auth service returns. The two
//! verification flags are integers on the wire (server contract), so they
//! stay integers here with `bool` accessors on top.

use serde::{Deserialize, Serialize};

/// The authenticated user's profile as returned by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: i64,
    pub is_verified: i64,
    pub must_change_password: i64,
}

impl AuthUser {
    pub fn is_verified(&self) -> bool {
        self.is_verified != 0
    }

    pub fn must_change_password(&self) -> bool {
        self.must_change_password != 0
    }

    /// Display name for greetings: first name if present, else username.
    pub fn display_name(&self) -> &str {
        if self.first_name.is_empty() {
            &self.username
        } else {
            &self.first_name
        }
    }
}

/// Username/password pair collected by the login form.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Payload for creating a new account.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterData {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Partial profile update - only the provided fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Payload for the change-password endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}
