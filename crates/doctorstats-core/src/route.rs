//! Route definitions and the authentication guard
//!
//! Pure logic with no I/O: which views exist, which need a session, and
//! what a front end should show for a given session state.

use crate::session::SessionState;
use std::fmt;

/// Application views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Landing,
    Login,
    Register,
    Dashboard,
    Analysis,
    Visualizations,
    Reports,
    Profile,
    NotFound,
}

impl Route {
    /// Parse a URL path into a route
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        match path {
            "" => Self::Landing,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/analysis" => Self::Analysis,
            "/visualizations" => Self::Visualizations,
            "/reports" => Self::Reports,
            "/profile" => Self::Profile,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Analysis => "/analysis",
            Self::Visualizations => "/visualizations",
            Self::Reports => "/reports",
            Self::Profile => "/profile",
            Self::NotFound => "/404",
        }
    }

    /// Protected views render only with a session token
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Analysis | Self::Visualizations | Self::Reports | Self::Profile
        )
    }

    /// Views an authenticated user is sent away from
    pub fn redirects_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// Where unauthenticated access and authorization failures land
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// Where a completed login lands
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_path())
    }
}

/// What to show for a requested route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render(Route),
    /// Session bootstrap still pending: show a loading indicator, do not redirect yet
    Loading,
    Redirect(Route),
}

/// Route guard
///
/// While the persisted token is still being checked the guard answers
/// `Loading` so a front end never flashes the login view first.
pub fn guard(route: Route, state: &SessionState) -> GuardDecision {
    if state.is_loading && (route.requires_auth() || route.redirects_when_authenticated()) {
        return GuardDecision::Loading;
    }

    let authenticated = state.token.is_some();
    if route.requires_auth() && !authenticated {
        return GuardDecision::Redirect(Route::auth_failure_redirect());
    }
    if route.redirects_when_authenticated() && authenticated {
        return GuardDecision::Redirect(Route::auth_success_redirect());
    }
    GuardDecision::Render(route)
}
