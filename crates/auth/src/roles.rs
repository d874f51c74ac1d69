use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockroom_core::DomainError;

/// Role assigned to a user account.
///
/// Roles are a closed set. They are ordered by privilege in spirit
/// (Admin ⊇ Keeper ⊇ Worker) but **not** hierarchical in enforcement: every
/// protected operation names its own allowed-role list explicitly (see
/// [`crate::authorize`]), so adding a role never silently widens access.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Keeper,
    Worker,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Keeper, Role::Worker];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Keeper => "Keeper",
            Role::Worker => "Worker",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Keeper" => Ok(Role::Keeper),
            "Worker" => Ok(Role::Worker),
            _ => Err(DomainError::validation("Invalid role")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("Supervisor".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());
    }
}
