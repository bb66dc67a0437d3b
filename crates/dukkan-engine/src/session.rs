//! # Sessions
//!
//! The explicit per-terminal session value.
//!
//! There is no ambient "current user": every engine call that acts on
//! behalf of an employee takes a `&Session`. That keeps several terminal
//! sessions independent on one shared store and makes permission checks
//! testable values instead of global state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use dukkan_core::{DiscountRate, Employee, Role};

/// An authenticated terminal session.
///
/// Obtained from [`AccessControl::authenticate`](crate::auth::AccessControl::authenticate);
/// carries everything the engine needs to enforce permissions without
/// another employee lookup.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Opaque session token.
    pub token: Uuid,

    /// Employee row id.
    pub employee_id: i64,

    /// Employee login name.
    pub employee_name: String,

    /// Role at login time.
    pub role: Role,

    /// Discount capability resolved at login time (manager always true).
    can_apply_discount: bool,

    /// When the session was opened.
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    /// Opens a session for an authenticated employee.
    pub fn open(employee: &Employee) -> Self {
        Session {
            token: Uuid::new_v4(),
            employee_id: employee.id,
            employee_name: employee.name.clone(),
            role: employee.role,
            can_apply_discount: employee.can_discount(),
            logged_in_at: Utc::now(),
        }
    }

    /// Whether this session may apply discounts at checkout.
    pub fn can_apply_discount(&self) -> bool {
        self.can_apply_discount
    }

    /// Gates a requested discount: sessions without the permission get
    /// zero, whatever the caller asked for. Not an error; the request is
    /// simply not honored.
    pub fn allowed_discount(&self, requested: DiscountRate) -> DiscountRate {
        if self.can_apply_discount {
            requested
        } else {
            DiscountRate::zero()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(role: Role, flag: bool) -> Employee {
        Employee {
            id: 7,
            name: "till".to_string(),
            role,
            password_hash: String::new(),
            can_apply_discount: flag,
        }
    }

    #[test]
    fn manager_session_always_discounts() {
        let session = Session::open(&employee(Role::Manager, false));
        assert!(session.can_apply_discount());

        let requested = DiscountRate::from_bps(1500);
        assert_eq!(session.allowed_discount(requested), requested);
    }

    #[test]
    fn unprivileged_session_gets_zero_discount() {
        let session = Session::open(&employee(Role::Seller, false));
        assert!(!session.can_apply_discount());
        assert!(session
            .allowed_discount(DiscountRate::from_bps(1500))
            .is_zero());
    }

    #[test]
    fn flagged_seller_keeps_discount() {
        let session = Session::open(&employee(Role::Seller, true));
        let requested = DiscountRate::from_bps(500);
        assert_eq!(session.allowed_discount(requested), requested);
    }

    #[test]
    fn tokens_are_unique() {
        let a = Session::open(&employee(Role::Seller, false));
        let b = Session::open(&employee(Role::Seller, false));
        assert_ne!(a.token, b.token);
    }
}
