//! Postgres-backed identity store over the `users` and `employees` tables.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use hrdesk_auth::{DirectoryError, Role, UserAccount, UserDirectory};
use hrdesk_core::{EmployeeId, UserId};

const ACCOUNT_COLUMNS: &str = r#"
    SELECT u.id, u.email, u.password_hash, u.role, u.is_active, e.id AS employee_id
    FROM users u
    LEFT JOIN employees e ON e.user_id = u.id
"#;

#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: Arc<PgPool>,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Make sure an active admin account with an employee record exists for
    /// `email`. An existing account is promoted and reactivated; its
    /// password is left alone.
    #[instrument(skip(self, password_hash), err)]
    pub async fn ensure_admin(&self, email: &str, password_hash: &str) -> Result<UserId, DirectoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let user_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (id, email, password_hash, role, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role, is_active = TRUE
            RETURNING id
            "#,
        )
        .bind(*UserId::new().as_uuid())
        .bind(email)
        .bind(password_hash)
        .bind(Role::Admin.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO employees (id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(*EmployeeId::new().as_uuid())
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(UserId::from_uuid(user_id))
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    #[instrument(skip(self, email), err)]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DirectoryError> {
        let row = sqlx::query(&format!("{ACCOUNT_COLUMNS} WHERE lower(u.email) = lower($1)"))
            .bind(email)
            .fetch_optional(&*self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(account_from_row).transpose()
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, DirectoryError> {
        let row = sqlx::query(&format!("{ACCOUNT_COLUMNS} WHERE u.id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(account_from_row).transpose()
    }

    #[instrument(skip(self), fields(employee_id = %employee_id), err)]
    async fn find_by_employee(&self, employee_id: EmployeeId) -> Result<Option<UserAccount>, DirectoryError> {
        let row = sqlx::query(&format!("{ACCOUNT_COLUMNS} WHERE e.id = $1"))
            .bind(*employee_id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(account_from_row).transpose()
    }

    #[instrument(skip(self), fields(employee_id = %employee_id), err)]
    async fn deactivate_employee(&self, employee_id: EmployeeId) -> Result<bool, DirectoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users u SET is_active = FALSE
            FROM employees e
            WHERE e.user_id = u.id AND e.id = $1
            "#,
        )
        .bind(*employee_id.as_uuid())
        .execute(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(employee_id = %employee_id, role = %role), err)]
    async fn assign_role(&self, employee_id: EmployeeId, role: Role) -> Result<bool, DirectoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users u SET role = $2
            FROM employees e
            WHERE e.user_id = u.id AND e.id = $1
            "#,
        )
        .bind(*employee_id.as_uuid())
        .bind(role.as_str())
        .execute(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn account_from_row(row: &sqlx::postgres::PgRow) -> Result<UserAccount, DirectoryError> {
    let corrupt = |e: sqlx::Error| DirectoryError::Corrupt(format!("failed to read user row: {e}"));

    let id: Uuid = row.try_get("id").map_err(corrupt)?;
    let role_tag: String = row.try_get("role").map_err(corrupt)?;
    let role = Role::parse(&role_tag)
        .ok_or_else(|| DirectoryError::Corrupt(format!("user {id} has unknown role {role_tag:?}")))?;
    let employee_id: Option<Uuid> = row.try_get("employee_id").map_err(corrupt)?;

    Ok(UserAccount {
        id: UserId::from_uuid(id),
        email: row.try_get("email").map_err(corrupt)?,
        password_hash: row.try_get("password_hash").map_err(corrupt)?,
        role,
        is_active: row.try_get("is_active").map_err(corrupt)?,
        employee_id: employee_id.map(EmployeeId::from_uuid),
    })
}

fn map_sqlx_error(err: sqlx::Error) -> DirectoryError {
    DirectoryError::Unavailable(err.to_string())
}
