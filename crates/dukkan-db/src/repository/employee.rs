//! # Employee Repository
//!
//! Employee account storage.
//!
//! The discount-permission rule lives at this write boundary: a manager
//! row always has `can_apply_discount = 1`, whatever the caller passed.
//! Presentation-layer checks can be bypassed; this one cannot.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukkan_core::{Employee, Role};

const EMPLOYEE_COLUMNS: &str = "id, name, role, password_hash, can_apply_discount";

/// Repository for employee database operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Finds an employee by login name.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE name = ?1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Gets an employee by row id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Lists employees, optionally filtered by a name substring.
    pub async fn list(&self, name_filter: Option<&str>) -> DbResult<Vec<Employee>> {
        let employees = match name_filter {
            Some(filter) => {
                sqlx::query_as::<_, Employee>(&format!(
                    "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE name LIKE ?1 ORDER BY name"
                ))
                .bind(format!("%{}%", filter.trim()))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Employee>(&format!(
                    "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY name"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(employees)
    }

    /// Inserts a new employee. The password must already be hashed.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - name already taken
    pub async fn insert(
        &self,
        name: &str,
        role: Role,
        password_hash: &str,
        can_apply_discount: bool,
    ) -> DbResult<Employee> {
        // Managers always hold the discount permission, regardless of
        // what the caller asked for.
        let can_apply_discount = role == Role::Manager || can_apply_discount;

        debug!(name = %name, role = %role, "Inserting employee");

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO employees (name, role, password_hash, can_apply_discount)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(role)
        .bind(password_hash)
        .bind(can_apply_discount)
        .fetch_one(&self.pool)
        .await?;

        Ok(Employee {
            id,
            name: name.to_string(),
            role,
            password_hash: password_hash.to_string(),
            can_apply_discount,
        })
    }

    /// Updates role, discount flag, and optionally the password hash.
    /// The manager rule applies here too.
    pub async fn update(
        &self,
        id: i64,
        role: Role,
        can_apply_discount: bool,
        password_hash: Option<&str>,
    ) -> DbResult<()> {
        let can_apply_discount = role == Role::Manager || can_apply_discount;

        debug!(id, role = %role, "Updating employee");

        let result = match password_hash {
            Some(hash) => {
                sqlx::query(
                    r#"
                    UPDATE employees
                    SET role = ?2, can_apply_discount = ?3, password_hash = ?4
                    WHERE id = ?1
                    "#,
                )
                .bind(id)
                .bind(role)
                .bind(can_apply_discount)
                .bind(hash)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    UPDATE employees
                    SET role = ?2, can_apply_discount = ?3
                    WHERE id = ?1
                    "#,
                )
                .bind(id)
                .bind(role)
                .bind(can_apply_discount)
                .execute(&self.pool)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", id.to_string()));
        }

        Ok(())
    }

    /// Updates an employee's own login name and/or password hash.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - new name already taken
    pub async fn update_credentials(
        &self,
        current_name: &str,
        new_name: Option<&str>,
        new_password_hash: Option<&str>,
    ) -> DbResult<()> {
        if new_name.is_none() && new_password_hash.is_none() {
            return Ok(());
        }

        debug!(name = %current_name, renaming = new_name.is_some(), "Updating credentials");

        let result = sqlx::query(
            r#"
            UPDATE employees
            SET name = COALESCE(?2, name),
                password_hash = COALESCE(?3, password_hash)
            WHERE name = ?1
            "#,
        )
        .bind(current_name)
        .bind(new_name)
        .bind(new_password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", current_name));
        }

        Ok(())
    }

    /// Deletes an employee by row id.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting employee");

        let result = sqlx::query("DELETE FROM employees WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", id.to_string()));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
