//! Principal resolution for the current request.
//!
//! There is no ambient security context: handlers receive the request's
//! [`Authentication`] (if any) and pass it explicitly to every check.

pub mod session;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An authenticated identity and the roles it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            roles: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// True when `name` is this user's username or one of its roles (case-insensitive).
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.username.eq_ignore_ascii_case(name)
            || self.roles.iter().any(|role| role.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// Placeholder for a request that has a session but nobody signed in.
    Anonymous,
    User(User),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    principal: Principal,
    authenticated: bool,
}

impl Authentication {
    pub fn new(principal: Principal, authenticated: bool) -> Self {
        Self {
            principal,
            authenticated,
        }
    }

    pub fn anonymous() -> Self {
        Self::new(Principal::Anonymous, true)
    }

    pub fn for_user(user: User) -> Self {
        Self::new(Principal::User(user), true)
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self.principal, Principal::Anonymous)
    }
}

/// The principal's user, whatever the authentication decision was. Access
/// checks go through [`authenticated_user`] instead.
pub fn current_user(authentication: Option<&Authentication>) -> Option<&User> {
    match authentication.map(Authentication::principal) {
        Some(Principal::User(user)) => Some(user),
        _ => None,
    }
}

/// False without a principal or for the anonymous placeholder; otherwise the
/// underlying authentication decision.
pub fn is_authenticated(authentication: Option<&Authentication>) -> bool {
    match authentication {
        None => false,
        Some(auth) if auth.is_anonymous() => false,
        Some(auth) => auth.authenticated,
    }
}

/// The current user, but only once the request is authenticated.
pub fn authenticated_user(authentication: Option<&Authentication>) -> Option<&User> {
    if is_authenticated(authentication) {
        current_user(authentication)
    } else {
        None
    }
}
