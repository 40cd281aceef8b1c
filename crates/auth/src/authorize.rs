//! Route-level authorization decisions.
//!
//! - No IO
//! - No panics
//! - Decisions depend only on the request's [`IdentityContext`]

use serde::Serialize;
use thiserror::Error;

use crate::{catalog, IdentityContext, Permission, Role};

/// What a route demands of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Every listed permission must be held.
    Permissions(Vec<Permission>),
    /// The caller's role must be one of the listed roles.
    Roles(Vec<Role>),
}

impl Requirement {
    pub fn permissions(required: impl IntoIterator<Item = Permission>) -> Self {
        Self::Permissions(required.into_iter().collect())
    }

    pub fn roles(required: impl IntoIterator<Item = Role>) -> Self {
        Self::Roles(required.into_iter().collect())
    }

    /// The denial reported when this requirement is not met.
    pub fn denial(&self) -> Denial {
        match self {
            Requirement::Permissions(required) => Denial {
                required_roles: Vec::new(),
                required_permissions: required.clone(),
            },
            Requirement::Roles(required) => Denial {
                required_roles: required.clone(),
                required_permissions: Vec::new(),
            },
        }
    }
}

/// Which requirement a denied caller failed to meet.
///
/// Exactly one of the two lists is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Denial {
    pub required_roles: Vec<Role>,
    pub required_permissions: Vec<Permission>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden")]
    Forbidden(Denial),
}

/// Check a single requirement against the caller.
pub fn authorize(identity: &IdentityContext, requirement: &Requirement) -> Result<(), AuthzError> {
    let granted = match requirement {
        Requirement::Permissions(required) => identity.permissions().contains_all(required),
        Requirement::Roles(required) => catalog::role_has_any(identity.role(), required),
    };

    if granted {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(requirement.denial()))
    }
}

/// Check requirements in order; the first unmet one decides the denial.
pub fn authorize_all<'a>(
    identity: &IdentityContext,
    requirements: impl IntoIterator<Item = &'a Requirement>,
) -> Result<(), AuthzError> {
    requirements
        .into_iter()
        .try_for_each(|requirement| authorize(identity, requirement))
}
