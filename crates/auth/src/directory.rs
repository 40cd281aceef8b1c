//! Identity store port consumed by login, refresh and employee administration.

use async_trait::async_trait;
use thiserror::Error;

use hrdesk_core::{EmployeeId, UserId};

use crate::Role;

/// Login account as seen by the session service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    /// Employee record attached to the account, if one exists.
    pub employee_id: Option<EmployeeId>,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("stored account is invalid: {0}")]
    Corrupt(String),

    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

/// Access to login accounts.
///
/// Lookups return `Ok(None)` for unknown accounts and updates return
/// `Ok(false)`; errors are reserved for store failures.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DirectoryError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, DirectoryError>;

    /// The account that owns the employee record.
    async fn find_by_employee(&self, employee_id: EmployeeId) -> Result<Option<UserAccount>, DirectoryError>;

    /// Mark the account behind an employee record inactive. Later logins and
    /// refreshes for it fail; access credentials already issued run out.
    async fn deactivate_employee(&self, employee_id: EmployeeId) -> Result<bool, DirectoryError>;

    /// Change the role of the account behind an employee record. Takes effect
    /// at the account's next login or refresh.
    async fn assign_role(&self, employee_id: EmployeeId, role: Role) -> Result<bool, DirectoryError>;
}

#[async_trait]
impl<D> UserDirectory for std::sync::Arc<D>
where
    D: UserDirectory + ?Sized,
{
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DirectoryError> {
        (**self).find_by_email(email).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, DirectoryError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_employee(&self, employee_id: EmployeeId) -> Result<Option<UserAccount>, DirectoryError> {
        (**self).find_by_employee(employee_id).await
    }

    async fn deactivate_employee(&self, employee_id: EmployeeId) -> Result<bool, DirectoryError> {
        (**self).deactivate_employee(employee_id).await
    }

    async fn assign_role(&self, employee_id: EmployeeId, role: Role) -> Result<bool, DirectoryError> {
        (**self).assign_role(employee_id, role).await
    }
}
