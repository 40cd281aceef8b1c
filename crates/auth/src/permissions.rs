use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Capability tag gating one action.
///
/// Declaration order is the canonical order used by [`PermissionSet`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
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
}

impl Permission {
    pub const ALL: [Permission; 15] = [
        Permission::ManageEmployees,
        Permission::ManageDepartments,
        Permission::ViewDepartments,
        Permission::ViewAnalytics,
        Permission::ExportReports,
        Permission::ViewAuditLogs,
        Permission::ReviewLeaves,
        Permission::RequestLeave,
        Permission::ViewOwnLeaves,
        Permission::ClockAttendance,
        Permission::ViewNotifications,
        Permission::ViewProfile,
        Permission::UpdateProfile,
        Permission::ManagePayslips,
        Permission::ViewOwnPayslips,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageEmployees => "manage_employees",
            Permission::ManageDepartments => "manage_departments",
            Permission::ViewDepartments => "view_departments",
            Permission::ViewAnalytics => "view_analytics",
            Permission::ExportReports => "export_reports",
            Permission::ViewAuditLogs => "view_audit_logs",
            Permission::ReviewLeaves => "review_leaves",
            Permission::RequestLeave => "request_leave",
            Permission::ViewOwnLeaves => "view_own_leaves",
            Permission::ClockAttendance => "clock_attendance",
            Permission::ViewNotifications => "view_notifications",
            Permission::ViewProfile => "view_profile",
            Permission::UpdateProfile => "update_profile",
            Permission::ManagePayslips => "manage_payslips",
            Permission::ViewOwnPayslips => "view_own_payslips",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == tag)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, owned set of permissions.
///
/// Values handed out by the catalog are independent copies; mutating one never
/// affects the catalog or any other holder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// True when every permission in `required` is held. Vacuously true for
    /// an empty requirement.
    pub fn contains_all<'a>(&self, required: impl IntoIterator<Item = &'a Permission>) -> bool {
        required.into_iter().all(|p| self.0.contains(p))
    }

    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    pub fn remove(&mut self, permission: Permission) -> bool {
        self.0.remove(&permission)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    /// Wire form used in credential claims.
    pub fn to_tags(&self) -> Vec<String> {
        self.iter().map(|p| p.as_str().to_string()).collect()
    }

    /// Parse wire tags, dropping anything the catalog does not know.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        tags.iter()
            .filter_map(|tag| Permission::parse(tag.as_ref()))
            .collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a Permission;
    type IntoIter = std::collections::btree_set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
