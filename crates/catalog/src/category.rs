use serde::{Deserialize, Serialize};

use stockroom_core::{CategoryId, DomainError, DomainResult};

/// An item grouping. Names are unique across the catalog.
///
/// Categories are hard-deletable, but only while no active item references
/// them; the store enforces that at deletion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
        }
    }
}

pub fn validate_category_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("Please provide a name"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert!(validate_category_name("Electronics").is_ok());
        assert!(validate_category_name("").is_err());
        assert!(validate_category_name("   ").is_err());
    }
}
