//! # Access Control
//!
//! Employee authentication and account management.
//!
//! Passwords are stored as argon2id PHC strings and verified with a
//! constant-shape failure path: an unknown name and a wrong password both
//! come back as `InvalidCredentials`.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::session::Session;
use dukkan_core::{validation, Employee, Role};
use dukkan_db::Database;

/// Authentication and employee management over the employee repository.
#[derive(Debug, Clone)]
pub struct AccessControl {
    db: Database,
}

impl AccessControl {
    /// Creates a new AccessControl service.
    pub fn new(db: Database) -> Self {
        AccessControl { db }
    }

    /// Authenticates an employee and opens a session.
    ///
    /// ## Returns
    /// * `Ok(Session)` - credentials verified
    /// * `Err(EngineError::InvalidCredentials)` - unknown name OR wrong
    ///   password; the caller cannot tell which
    pub async fn authenticate(&self, name: &str, password: &str) -> EngineResult<Session> {
        let employee = match self.db.employees().find_by_name(name.trim()).await? {
            Some(employee) => employee,
            None => {
                warn!(name = %name, "Login attempt for unknown employee");
                return Err(EngineError::InvalidCredentials);
            }
        };

        if !verify_password(password, &employee.password_hash) {
            warn!(name = %employee.name, "Login attempt with wrong password");
            return Err(EngineError::InvalidCredentials);
        }

        let session = Session::open(&employee);
        info!(name = %employee.name, role = %employee.role, "Employee logged in");
        Ok(session)
    }

    /// Whether the employee may apply discounts. Managers always may.
    pub fn can_apply_discount(&self, employee: &Employee) -> bool {
        employee.can_discount()
    }

    /// Registers a new employee with a hashed password.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - name already taken
    pub async fn register(
        &self,
        name: &str,
        role: Role,
        password: &str,
        can_apply_discount: bool,
    ) -> EngineResult<Employee> {
        validation::validate_employee_name(name)?;
        validation::validate_password(password)?;

        let hash = hash_password(password)?;
        let employee = self
            .db
            .employees()
            .insert(name.trim(), role, &hash, can_apply_discount)
            .await?;

        info!(name = %employee.name, role = %employee.role, "Employee registered");
        Ok(employee)
    }

    /// Updates an employee's role, discount flag, and optionally the
    /// password. The manager-always-discounts rule is enforced by the
    /// repository's write boundary.
    pub async fn update_employee(
        &self,
        id: i64,
        role: Role,
        can_apply_discount: bool,
        new_password: Option<&str>,
    ) -> EngineResult<()> {
        let hash = match new_password {
            Some(password) => {
                validation::validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        self.db
            .employees()
            .update(id, role, can_apply_discount, hash.as_deref())
            .await?;

        debug!(id, role = %role, "Employee updated");
        Ok(())
    }

    /// Changes the session owner's own login name and/or password, after
    /// re-verifying the current password.
    pub async fn change_credentials(
        &self,
        session: &Session,
        current_password: &str,
        new_name: Option<&str>,
        new_password: Option<&str>,
    ) -> EngineResult<()> {
        // Re-authenticate before changing anything.
        let employee = self
            .db
            .employees()
            .find_by_name(&session.employee_name)
            .await?
            .ok_or(EngineError::InvalidCredentials)?;

        if !verify_password(current_password, &employee.password_hash) {
            return Err(EngineError::InvalidCredentials);
        }

        if let Some(name) = new_name {
            validation::validate_employee_name(name)?;
        }
        let new_hash = match new_password {
            Some(password) => {
                validation::validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        self.db
            .employees()
            .update_credentials(
                &employee.name,
                new_name.map(str::trim),
                new_hash.as_deref(),
            )
            .await?;

        info!(name = %employee.name, renamed = new_name.is_some(), "Credentials changed");
        Ok(())
    }
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password for storage (argon2id, fresh random salt).
pub fn hash_password(password: &str) -> EngineResult<String> {
    use argon2::password_hash::{rand_core::OsRng, SaltString};
    use argon2::PasswordHasher;

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            EngineError::Db(dukkan_db::DbError::Internal(format!(
                "password hashing failed: {e}"
            )))
        })?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC hash string.
fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================
