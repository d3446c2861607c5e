//! Route guard: decides whether a requested screen may render.
//!
//! The guard sees authentication as a single boolean; it never inspects
//! tokens or partial credential state.

/// Path of the login screen. Every other path is protected.
pub const LOGIN_PATH: &str = "/login";

/// Outcome of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// The requested screen may render.
    Render,
    /// Unauthenticated access to a protected screen. `from` preserves the
    /// originally requested path so navigation can return there after login.
    RedirectToLogin { from: String },
    /// Already authenticated; the login screen bounces to the home screen.
    RedirectToHome,
}

pub fn decide(authenticated: bool, path: &str) -> RouteDecision {
    let is_login = path == LOGIN_PATH;
    match (authenticated, is_login) {
        (true, true) => RouteDecision::RedirectToHome,
        (true, false) => RouteDecision::Render,
        (false, true) => RouteDecision::Render,
        (false, false) => RouteDecision::RedirectToLogin {
            from: path.to_string(),
        },
    }
}
