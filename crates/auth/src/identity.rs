use serde::Serialize;

use hrdesk_core::{EmployeeId, UserId};

use crate::{catalog, Credential, PermissionSet, Role};

/// Authenticated identity for one request.
///
/// Built once from a verified access credential and then only read. Route
/// guards and handlers receive it by value from the request extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityContext {
    subject: UserId,
    role: Option<Role>,
    employee_id: Option<EmployeeId>,
    permissions: PermissionSet,
}

impl IdentityContext {
    pub fn new(
        subject: UserId,
        role: Option<Role>,
        employee_id: Option<EmployeeId>,
        permissions: PermissionSet,
    ) -> Self {
        Self {
            subject,
            role,
            employee_id,
            permissions,
        }
    }

    /// Resolve the identity carried by a verified credential.
    ///
    /// An absent or empty permission claim is replaced with the catalog's
    /// current set for the credential's role; a credential without a known
    /// role therefore ends up with no permissions at all. A non-empty claim
    /// is used as carried, so names the catalog does not know grant nothing.
    pub fn from_credential(credential: Credential) -> Self {
        let permissions = match credential.permissions {
            Some(claimed) => claimed,
            None => credential
                .role
                .map(catalog::permissions_for_role)
                .unwrap_or_default(),
        };

        Self {
            subject: credential.subject,
            role: credential.role,
            employee_id: credential.employee_id,
            permissions,
        }
    }

    pub fn subject(&self) -> UserId {
        self.subject
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Role tag as it should appear in logs and audit metadata.
    pub fn role_tag(&self) -> &'static str {
        self.role.map(|r| r.as_str()).unwrap_or("")
    }

    pub fn employee_id(&self) -> Option<EmployeeId> {
        self.employee_id
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }
}
