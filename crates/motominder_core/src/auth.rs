//! Per-request authentication and role authorization.
//!
//! # Responsibility
//! - Answer "is the caller authenticated" and "does the caller hold a role".
//!
//! # Invariants
//! - An auth context is immutable after construction; it is safe to share
//!   across concurrent interactor invocations.
//! - A role missing from the grant map is never authorized.
//! - No process-wide session exists; each request builds its own context.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Closed set of authorization roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationRole {
    None,
    Admin,
    Accounting,
    General,
}

impl AuthorizationRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Admin => "admin",
            Self::Accounting => "accounting",
            Self::General => "general",
        }
    }
}

impl Display for AuthorizationRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Auth queries consumed by interactors.
pub trait AuthService {
    fn is_authenticated(&self) -> bool;
    fn is_authorized(&self, role: AuthorizationRole) -> bool;
}

impl<T: AuthService + ?Sized> AuthService for &T {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }

    fn is_authorized(&self, role: AuthorizationRole) -> bool {
        (**self).is_authorized(role)
    }
}

/// Auth context built for one caller session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAuth {
    authenticated: bool,
    roles: Option<BTreeMap<AuthorizationRole, bool>>,
}

impl SessionAuth {
    /// Builds a validated auth context.
    ///
    /// # Errors
    /// Returns an error when `roles` is absent.
    pub fn try_new(
        is_authenticated: bool,
        roles: Option<BTreeMap<AuthorizationRole, bool>>,
    ) -> Result<Self, Error> {
        let auth = Self {
            authenticated: is_authenticated,
            roles,
        };
        auth.validate()?;
        Ok(auth)
    }

    /// Unauthenticated caller holding no roles.
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            roles: Some(BTreeMap::new()),
        }
    }

    /// Authenticated caller granted exactly the listed roles.
    pub fn with_roles(roles: &[AuthorizationRole]) -> Self {
        Self {
            authenticated: true,
            roles: Some(roles.iter().map(|role| (*role, true)).collect()),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        match self.roles {
            Some(_) => Ok(()),
            None => Err(Error::from_message(
                "The roles and access permissions cannot be null.",
            )),
        }
    }
}

impl AuthService for SessionAuth {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn is_authorized(&self, role: AuthorizationRole) -> bool {
        self.roles
            .as_ref()
            .and_then(|roles| roles.get(&role).copied())
            .unwrap_or(false)
    }
}
