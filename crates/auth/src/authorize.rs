use thiserror::Error;

use crate::Role;

/// Allow-lists used by the API surface.
///
/// Each protected operation names one of these (or its own list) explicitly;
/// no hierarchy is inferred from role ordering.
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
pub const STOCK_STAFF: &[Role] = &[Role::Admin, Role::Keeper];
pub const ANY_ROLE: &[Role] = &[Role::Admin, Role::Keeper, Role::Worker];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("Forbidden: You do not have permission")]
    Forbidden,
}

/// Authorize a resolved role against an operation's allowed-role list.
///
/// - No IO
/// - No panics
/// - Pure function of its two inputs
pub fn authorize(role: Role, allowed: &[Role]) -> Result<(), AuthzError> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_roles_are_permitted() {
        assert!(authorize(Role::Admin, ADMIN_ONLY).is_ok());
        assert!(authorize(Role::Keeper, STOCK_STAFF).is_ok());
        assert!(authorize(Role::Worker, ANY_ROLE).is_ok());
    }

    #[test]
    fn non_member_roles_are_denied() {
        assert_eq!(authorize(Role::Keeper, ADMIN_ONLY), Err(AuthzError::Forbidden));
        assert_eq!(authorize(Role::Worker, STOCK_STAFF), Err(AuthzError::Forbidden));
    }

    #[test]
    fn empty_allow_list_denies_everyone() {
        for role in Role::ALL {
            assert!(authorize(role, &[]).is_err());
        }
    }
}
