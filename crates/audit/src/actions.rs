//! Well-known action and entity tags.

pub const AUTHZ_DENIED: &str = "AUTHZ_DENIED";

pub const LEAVE_REQUESTED: &str = "LEAVE_REQUESTED";
pub const LEAVE_APPROVED: &str = "LEAVE_APPROVED";
pub const LEAVE_REJECTED: &str = "LEAVE_REJECTED";
pub const LEAVE_CANCELLED: &str = "LEAVE_CANCELLED";

pub const CLOCK_IN: &str = "CLOCK_IN";
pub const CLOCK_OUT: &str = "CLOCK_OUT";

pub const EMPLOYEE_CREATED: &str = "EMPLOYEE_CREATED";
pub const EMPLOYEE_UPDATED: &str = "EMPLOYEE_UPDATED";
pub const EMPLOYEE_DEACTIVATED: &str = "EMPLOYEE_DEACTIVATED";

pub const DEPARTMENT_CREATED: &str = "DEPARTMENT_CREATED";

pub const PAYSLIP_CREATED: &str = "PAYSLIP_CREATED";

pub const PROFILE_UPDATED: &str = "PROFILE_UPDATED";

/// Entity tags.
pub mod entities {
    pub const ROUTE: &str = "route";
    pub const LEAVE_REQUEST: &str = "leave_request";
    pub const ATTENDANCE: &str = "attendance";
    pub const EMPLOYEE: &str = "employee";
    pub const DEPARTMENT: &str = "department";
    pub const PAYSLIP: &str = "payslip";
}
