//! Signed-in state and route guarding.
//!
//! A [`SessionContext`] is owned by whoever drives the client and passed to the
//! calls that need it; there is no global store.

use log::debug;

use crate::api::LoginResponse;

/// Path unauthenticated users are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Path authenticated users land on instead of the login page.
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserInfo {
    pub user_id: Option<u64>,
    pub nickname: String,
    pub token: Option<String>,
    pub qq_id: Option<String>,
    pub mc_name: Option<String>,
}

impl From<LoginResponse> for UserInfo {
    fn from(resp: LoginResponse) -> Self {
        Self {
            user_id: resp.user_id,
            nickname: resp.nickname,
            token: resp.token,
            qq_id: resp.qq_id,
            mc_name: resp.mc_name,
        }
    }
}

/// In-memory session. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    user: Option<UserInfo>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&mut self, user: UserInfo) {
        debug!("Session signed in as {}", user.nickname);
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            debug!("Session signed out for {}", user.nickname);
        }
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    /// A session counts as authenticated only when the user has a nickname.
    pub fn is_authenticated(&self) -> bool {
        self.user.as_ref().is_some_and(|u| !u.nickname.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub requires_auth: bool,
}

impl Route {
    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: false,
        }
    }

    pub fn protected(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(String),
}

/// Decides whether navigation to `route` may go ahead.
pub fn guard(route: &Route, session: &SessionContext) -> Navigation {
    let authenticated = session.is_authenticated();

    if route.requires_auth && !authenticated {
        debug!("Redirecting {} to {}: not signed in", route.path, LOGIN_PATH);
        return Navigation::Redirect(LOGIN_PATH.to_string());
    }

    if route.path == LOGIN_PATH && authenticated {
        return Navigation::Redirect(HOME_PATH.to_string());
    }

    Navigation::Proceed
}
