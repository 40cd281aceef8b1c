use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use hrdesk_auth::{DirectoryError, Role, UserAccount, UserDirectory};
use hrdesk_core::{EmployeeId, UserId};

/// In-memory identity store with simple admin operations.
///
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    accounts: RwLock<HashMap<UserId, UserAccount>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account. Emails are matched case-insensitively,
    /// so an existing account with the same email is replaced.
    pub fn upsert(&self, account: UserAccount) -> Result<(), DirectoryError> {
        let mut accounts = self.write()?;
        accounts.retain(|id, a| *id == account.id || !a.email.eq_ignore_ascii_case(&account.email));
        accounts.insert(account.id, account);
        Ok(())
    }

    /// Returns `false` when the account does not exist.
    pub fn set_active(&self, id: UserId, is_active: bool) -> Result<bool, DirectoryError> {
        Ok(self.write()?.get_mut(&id).map(|a| a.is_active = is_active).is_some())
    }

    /// Returns `false` when the account does not exist.
    pub fn set_role(&self, id: UserId, role: Role) -> Result<bool, DirectoryError> {
        Ok(self.write()?.get_mut(&id).map(|a| a.role = role).is_some())
    }

    fn update_by_employee(
        &self,
        employee_id: EmployeeId,
        f: impl FnOnce(&mut UserAccount),
    ) -> Result<bool, DirectoryError> {
        let mut accounts = self.write()?;
        let found = accounts
            .values_mut()
            .find(|a| a.employee_id == Some(employee_id));
        Ok(found.map(f).is_some())
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<UserId, UserAccount>>, DirectoryError> {
        self.accounts
            .write()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DirectoryError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))?;
        Ok(accounts.values().find(|a| a.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, DirectoryError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))?;
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_employee(&self, employee_id: EmployeeId) -> Result<Option<UserAccount>, DirectoryError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))?;
        Ok(accounts.values().find(|a| a.employee_id == Some(employee_id)).cloned())
    }

    async fn deactivate_employee(&self, employee_id: EmployeeId) -> Result<bool, DirectoryError> {
        self.update_by_employee(employee_id, |a| a.is_active = false)
    }

    async fn assign_role(&self, employee_id: EmployeeId, role: Role) -> Result<bool, DirectoryError> {
        self.update_by_employee(employee_id, |a| a.role = role)
    }
}
