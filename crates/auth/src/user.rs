//! User accounts and the rules guarding their mutation.

use chrono::{DateTime, Utc};

use stockroom_core::{DomainError, DomainResult, UserId};

use crate::Role;

/// A user account.
///
/// `password_hash` stays inside the domain/store boundary; API responses
/// project users into DTOs that omit it. Accounts are never hard-deleted —
/// `is_active` gates login instead, so ledger attribution stays intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted by the Admin-gated registration operation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// The mutable slice of a user record: role and active flag, nothing else.
/// Credentials are not updatable through this path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserUpdate {
    pub role: Role,
    pub is_active: bool,
}

pub fn validate_registration(new_user: &NewUser) -> DomainResult<()> {
    if new_user.username.trim().is_empty() {
        return Err(DomainError::validation("Please provide a username"));
    }
    if new_user.password.len() < 8 {
        return Err(DomainError::validation(
            "Password must be at least 8 characters",
        ));
    }
    Ok(())
}

/// An admin may change anyone's role or active flag, except flipping their
/// own account inactive (self-lockout prevention).
pub fn validate_user_update(actor: UserId, target: UserId, update: &UserUpdate) -> DomainResult<()> {
    if actor == target && !update.is_active {
        return Err(DomainError::validation(
            "Admin cannot deactivate their own account.",
        ));
    }
    Ok(())
}
