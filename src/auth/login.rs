//! Login flow: the single entry point that turns form input into a session.

use crate::models::LoginCredentials;

use super::session::SessionManager;

/// State backing the login screen. The host UI binds its inputs here and
/// calls `submit`; any failure message to show near the form lands in
/// `error`.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill the username (e.g. from the saved `last_username`).
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Attempt login with the current form contents. Returns true on
    /// success; on failure the message to display is left in `self.error`.
    pub async fn submit(&mut self, session: &mut SessionManager) -> bool {
        let username = self.username.trim().to_string();
        if username.is_empty() || self.password.is_empty() {
            self.error = Some("Username and password required".to_string());
            return false;
        }

        self.error = None;
        let credentials = LoginCredentials {
            username,
            password: self.password.clone(),
        };

        match session.login(&credentials).await {
            Ok(_) => {
                self.password.clear();
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }
}
