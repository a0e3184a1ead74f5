//! Foreign references carried by a write.
//!
//! Storage resolves each [`Reference`] before the first mutating statement;
//! the first one missing aborts the write and is reported by name and id.

use uuid::Uuid;
use zakat_shared::AppError;

/// A foreign row a write depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    /// A donor (muzakki).
    Donor(Uuid),
    /// A beneficiary (mustahiq).
    Beneficiary(Uuid),
    /// A program.
    Program(Uuid),
    /// A beneficiary category (asnaf).
    Category(Uuid),
}

impl Reference {
    /// Entity name used in messages.
    #[must_use]
    pub const fn entity(&self) -> &'static str {
        match self {
            Self::Donor(_) => "donor",
            Self::Beneficiary(_) => "beneficiary",
            Self::Program(_) => "program",
            Self::Category(_) => "category",
        }
    }

    /// The referenced id.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::Donor(id) | Self::Beneficiary(id) | Self::Program(id) | Self::Category(id) => {
                *id
            }
        }
    }

    /// The error reported when this reference does not resolve.
    #[must_use]
    pub fn not_found(&self) -> AppError {
        AppError::ReferenceNotFound(self.to_string())
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} not found: {}", self.entity(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_entity_and_id() {
        let id = Uuid::nil();
        let err = Reference::Beneficiary(id).not_found();
        assert_eq!(err.error_code(), "REFERENCE_NOT_FOUND");
        assert_eq!(
            err.to_string(),
            "Reference not found: beneficiary not found: 00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_id_and_entity() {
        let id = Uuid::new_v4();
        assert_eq!(Reference::Program(id).id(), id);
        assert_eq!(Reference::Donor(id).entity(), "donor");
        assert_eq!(Reference::Category(id).entity(), "category");
    }
}
