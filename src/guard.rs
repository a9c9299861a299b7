//! Role-based route guarding
//!
//! Evaluated on every navigation to a protected view. Evaluation is a pure
//! function of the session snapshot: synchronous, side-effect-free, and
//! never touching the network. The check is a UX convenience: the backend
//! enforces authorization on every call regardless of what the guard lets
//! the user see.

use crate::domain::Role;
use crate::session::Session;

/// Client-visible routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Public login view.
    Login,
    /// `/` - pure redirect dispatcher, never rendered.
    Home,
    /// Admin metrics overview.
    Dashboard,
    /// User management, including the admins/experts/vendors sub-tabs.
    Users,
    /// Project management.
    Projects,
    /// New-project form.
    ProjectNew,
    /// Worker task dashboard.
    Tasks,
}

const WORKER_AND_ADMIN: &[Role] = &[Role::User, Role::Expert, Role::Vendor, Role::Admin];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Home => "/",
            Self::Dashboard => "/dashboard",
            Self::Users => "/users",
            Self::Projects => "/projects",
            Self::ProjectNew => "/projects/new",
            Self::Tasks => "/tasks",
        }
    }

    /// Resolve a requested path. `/users/*` sub-tabs share the users route;
    /// anything unknown falls through to the dashboard, as the original
    /// router's catch-all did.
    pub fn match_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/login" => Self::Login,
            "/dashboard" => Self::Dashboard,
            "/projects" => Self::Projects,
            "/projects/new" => Self::ProjectNew,
            "/tasks" => Self::Tasks,
            _ if trimmed == "/users" || trimmed.starts_with("/users/") => Self::Users,
            _ => Self::Dashboard,
        }
    }

    /// Roles allowed to render this route. An empty slice means any
    /// authenticated role; public routes are handled before this is read.
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            Self::Login | Self::Home => &[],
            Self::Dashboard | Self::Users | Self::Projects | Self::ProjectNew => ADMIN_ONLY,
            Self::Tasks => WORKER_AND_ADMIN,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login)
    }
}

/// Outcome of one guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Render the requested route.
    Render(Route),
    /// Go elsewhere. `return_to` carries the originally requested path when
    /// bouncing to login, so the caller can come back after signing in.
    Redirect {
        to: Route,
        return_to: Option<String>,
    },
}

impl Decision {
    fn to_login(requested: Route) -> Self {
        Self::Redirect {
            to: Route::Login,
            return_to: Some(requested.path().to_string()),
        }
    }

    fn to(route: Route) -> Self {
        Self::Redirect {
            to: route,
            return_to: None,
        }
    }
}

/// Where `/` sends the current session.
pub fn dispatch_home(session: &Session) -> Route {
    if session.token.is_none() {
        return Route::Login;
    }
    match session.role {
        Some(role) if role.is_worker() => Route::Tasks,
        Some(Role::Admin) => Route::Dashboard,
        _ => Route::Login,
    }
}

/// Evaluate one navigation.
pub fn evaluate(session: &Session, route: Route) -> Decision {
    if route.is_public() {
        return Decision::Render(route);
    }
    if let Route::Home = route {
        return Decision::to(dispatch_home(session));
    }
    if session.token.is_none() {
        return Decision::to_login(route);
    }
    // Token present but undecodable: same as having none.
    let Some(role) = session.role else {
        return Decision::to_login(route);
    };

    let required = route.required_roles();
    if required.is_empty() || required.contains(&role) {
        return Decision::Render(route);
    }
    if role.is_admin() {
        Decision::to(Route::Dashboard)
    } else if role.is_worker() {
        Decision::to(Route::Tasks)
    } else {
        Decision::to_login(route)
    }
}

/// Follow redirects from a requested path until a route renders.
///
/// Returns the terminal route and, when the chain passed through a login
/// redirect, the path to come back to afterwards. Each redirect target is
/// either public or that role's own home, so the chain settles within two
/// hops.
pub fn resolve(session: &Session, path: &str) -> (Route, Option<String>) {
    let mut route = Route::match_path(path);
    let mut return_to = None;
    loop {
        match evaluate(session, route) {
            Decision::Render(route) => return (route, return_to),
            Decision::Redirect { to, return_to: r } => {
                if return_to.is_none() {
                    return_to = r;
                }
                route = to;
            }
        }
    }
}
