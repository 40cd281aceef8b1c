//! Role to permission policy.
//!
//! The table below is the only place permissions are granted. It is constant
//! data, so concurrent readers need no synchronization, and every accessor
//! returns an owned copy.

use crate::{Permission, PermissionSet, Role};

use Permission::*;

const ADMIN: &[Permission] = &[
    ManageEmployees,
    ManageDepartments,
    ViewDepartments,
    ViewAnalytics,
    ExportReports,
    ViewAuditLogs,
    ReviewLeaves,
    RequestLeave,
    ViewOwnLeaves,
    ClockAttendance,
    ViewNotifications,
    ViewProfile,
    UpdateProfile,
    ManagePayslips,
    ViewOwnPayslips,
];

// Managers do not manage departments and do not read the audit log.
const MANAGER: &[Permission] = &[
    ManageEmployees,
    ViewDepartments,
    ViewAnalytics,
    ExportReports,
    ReviewLeaves,
    RequestLeave,
    ViewOwnLeaves,
    ClockAttendance,
    ViewNotifications,
    ViewProfile,
    UpdateProfile,
    ManagePayslips,
    ViewOwnPayslips,
];

const EMPLOYEE: &[Permission] = &[
    RequestLeave,
    ViewOwnLeaves,
    ClockAttendance,
    ViewNotifications,
    ViewProfile,
    UpdateProfile,
    ViewOwnPayslips,
];

fn table(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => ADMIN,
        Role::Manager => MANAGER,
        Role::Employee => EMPLOYEE,
    }
}

/// Permissions granted to `role`.
pub fn permissions_for_role(role: Role) -> PermissionSet {
    table(role).iter().copied().collect()
}

/// Permissions for a role tag as it appears on the wire.
///
/// An unknown or empty tag yields an empty set. Callers must read "no
/// permissions" as fully unauthorized.
pub fn permissions_for_role_tag(tag: &str) -> PermissionSet {
    Role::parse(tag).map(permissions_for_role).unwrap_or_default()
}

pub fn role_has_any(role: Option<Role>, candidates: &[Role]) -> bool {
    role.is_some_and(|role| candidates.contains(&role))
}

pub fn permissions_include(permissions: &PermissionSet, required: Permission) -> bool {
    permissions.contains(required)
}
