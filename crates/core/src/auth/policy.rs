//! Role policy: `(role, resource, action) -> allow/deny`.
//!
//! Entity logic never looks at roles. The routing layer asks
//! [`is_allowed`] before doing anything else with a request.

use zakat_shared::{AppError, Role};

/// Things a caller can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Donors (muzakki).
    Donor,
    /// Beneficiary categories (asnaf).
    Category,
    /// Beneficiaries (mustahiq).
    Beneficiary,
    /// Programs.
    Program,
    /// Donation receipts.
    Receipt,
    /// Distributions.
    Distribution,
    /// Aggregate reports.
    Report,
    /// Staff accounts.
    User,
}

impl Resource {
    /// Plural name used in messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Donor => "donors",
            Self::Category => "categories",
            Self::Beneficiary => "beneficiaries",
            Self::Program => "programs",
            Self::Receipt => "receipts",
            Self::Distribution => "distributions",
            Self::Report => "reports",
            Self::User => "users",
        }
    }
}

/// Operations on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// List or get.
    Read,
    /// Create.
    Create,
    /// Update.
    Update,
    /// Delete.
    Delete,
}

impl Action {
    const fn verb(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Returns true if `role` may perform `action` on `resource`.
#[must_use]
pub const fn is_allowed(role: Role, resource: Resource, action: Action) -> bool {
    use Action::{Create, Delete, Read, Update};
    use Resource::{Beneficiary, Category, Distribution, Donor, Program, Receipt, Report, User};

    match (resource, action) {
        (Report, Read) => true,
        (Report, _) => false,
        (User, _) => matches!(role, Role::Admin),
        (_, Read) => true,
        (_, Delete) => matches!(role, Role::Admin),
        (Donor | Beneficiary | Receipt | Distribution, Create | Update) => {
            matches!(role, Role::Admin | Role::Staff)
        }
        (Category | Program, Create | Update) => matches!(role, Role::Admin),
    }
}

/// Policy check as a `Result`, for handlers.
///
/// # Errors
///
/// Returns `AppError::Forbidden` when the role may not perform the action.
pub fn authorize(role: Role, resource: Resource, action: Action) -> Result<(), AppError> {
    if is_allowed(role, resource, action) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role '{role}' may not {} {}",
            action.verb(),
            resource.name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ALL_RESOURCES: [Resource; 8] = [
        Resource::Donor,
        Resource::Category,
        Resource::Beneficiary,
        Resource::Program,
        Resource::Receipt,
        Resource::Distribution,
        Resource::Report,
        Resource::User,
    ];

    #[test]
    fn test_everyone_reads_everything_but_users() {
        for role in Role::ALL {
            for resource in ALL_RESOURCES {
                let expected = resource != Resource::User || role == Role::Admin;
                assert_eq!(is_allowed(role, resource, Action::Read), expected, "{role} {resource:?}");
            }
        }
    }

    #[rstest]
    #[case(Resource::Donor, true)]
    #[case(Resource::Beneficiary, true)]
    #[case(Resource::Receipt, true)]
    #[case(Resource::Distribution, true)]
    #[case(Resource::Category, false)]
    #[case(Resource::Program, false)]
    #[case(Resource::User, false)]
    #[case(Resource::Report, false)]
    fn test_staff_writes(#[case] resource: Resource, #[case] allowed: bool) {
        assert_eq!(is_allowed(Role::Staff, resource, Action::Create), allowed);
        assert_eq!(is_allowed(Role::Staff, resource, Action::Update), allowed);
        assert!(!is_allowed(Role::Staff, resource, Action::Delete));
    }

    #[test]
    fn test_viewer_never_writes() {
        for resource in ALL_RESOURCES {
            for action in [Action::Create, Action::Update, Action::Delete] {
                assert!(!is_allowed(Role::Viewer, resource, action));
            }
        }
    }

    #[test]
    fn test_admin_writes_everything_except_reports() {
        for resource in ALL_RESOURCES {
            for action in [Action::Create, Action::Update, Action::Delete] {
                assert_eq!(
                    is_allowed(Role::Admin, resource, action),
                    resource != Resource::Report
                );
            }
        }
    }

    #[test]
    fn test_authorize_message() {
        let err = authorize(Role::Viewer, Resource::Receipt, Action::Delete).unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.to_string(), "Access denied: role 'viewer' may not delete receipts");
        assert!(authorize(Role::Admin, Resource::Receipt, Action::Delete).is_ok());
    }
}
