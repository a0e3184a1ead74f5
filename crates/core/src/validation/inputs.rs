//! Master-data and account inputs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use zakat_shared::{AppError, Role};

use super::{clean_optional, declared_violations, finish, not_blank, parse_one_of, required};
use crate::fund::BeneficiaryStatus;

// ============================================================================
// Donor
// ============================================================================

/// Donor create/update payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct DonorInput {
    /// Full name.
    #[validate(
        custom(function = "not_blank"),
        length(max = 150, message = "must be at most 150 characters")
    )]
    pub name: String,
    /// Phone number, unique across donors.
    #[validate(length(min = 6, max = 20, message = "must be between 6 and 20 characters"))]
    pub phone: String,
    /// Postal address.
    #[validate(custom(function = "not_blank"))]
    pub address: String,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Validated donor fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonorDraft {
    /// Full name.
    pub name: String,
    /// Phone number.
    pub phone: String,
    /// Postal address.
    pub address: String,
    /// Notes.
    pub notes: Option<String>,
}

impl DonorInput {
    /// Validates the payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every failing field.
    pub fn into_draft(self) -> Result<DonorDraft, AppError> {
        let violations = declared_violations(&self);
        if !violations.is_empty() {
            return Err(finish(violations));
        }
        Ok(DonorDraft {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            notes: clean_optional(self.notes),
        })
    }
}

// ============================================================================
// Category (asnaf)
// ============================================================================

/// Category create/update payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CategoryInput {
    /// Category name.
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "must be at most 100 characters")
    )]
    pub name: String,
    /// Description.
    pub description: Option<String>,
}

/// Validated category fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDraft {
    /// Category name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
}

impl CategoryInput {
    /// Validates the payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every failing field.
    pub fn into_draft(self) -> Result<CategoryDraft, AppError> {
        let violations = declared_violations(&self);
        if !violations.is_empty() {
            return Err(finish(violations));
        }
        Ok(CategoryDraft {
            name: self.name.trim().to_string(),
            description: clean_optional(self.description),
        })
    }
}

// ============================================================================
// Beneficiary (mustahiq)
// ============================================================================

/// Beneficiary create/update payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct BeneficiaryInput {
    /// Full name.
    #[validate(
        custom(function = "not_blank"),
        length(max = 150, message = "must be at most 150 characters")
    )]
    pub name: String,
    /// Phone number, unique across beneficiaries.
    #[validate(length(min = 6, max = 20, message = "must be between 6 and 20 characters"))]
    pub phone: String,
    /// Postal address.
    #[validate(custom(function = "not_blank"))]
    pub address: String,
    /// Category the beneficiary belongs to.
    #[serde(alias = "asnaf_id")]
    #[validate(required(message = "is required"))]
    pub category_id: Option<Uuid>,
    /// `active`, `inactive` or `pending`; defaults to `pending`.
    pub status: Option<String>,
    /// Description.
    pub description: Option<String>,
}

/// Validated beneficiary fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeneficiaryDraft {
    /// Full name.
    pub name: String,
    /// Phone number.
    pub phone: String,
    /// Postal address.
    pub address: String,
    /// Category reference.
    pub category_id: Uuid,
    /// Status.
    pub status: BeneficiaryStatus,
    /// Description.
    pub description: Option<String>,
}

impl BeneficiaryInput {
    /// Validates the payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every failing field.
    pub fn into_draft(self) -> Result<BeneficiaryDraft, AppError> {
        let mut violations = declared_violations(&self);
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => Some(BeneficiaryStatus::default()),
            Some(raw) => parse_one_of("status", raw, &mut violations),
        };

        let (Some(category_id), Some(status), true) =
            (self.category_id, status, violations.is_empty())
        else {
            if self.category_id.is_none() {
                violations.push(required("category_id"));
            }
            return Err(finish(violations));
        };

        Ok(BeneficiaryDraft {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            category_id,
            status,
            description: clean_optional(self.description),
        })
    }
}

// ============================================================================
// Program
// ============================================================================

/// Program create/update payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProgramInput {
    /// Program name.
    #[validate(
        custom(function = "not_blank"),
        length(max = 150, message = "must be at most 150 characters")
    )]
    pub name: String,
    /// Free-form program type (e.g. `education`, `health`).
    #[serde(alias = "type")]
    #[validate(
        custom(function = "not_blank"),
        length(max = 50, message = "must be at most 50 characters")
    )]
    pub program_type: String,
    /// Description.
    pub description: Option<String>,
    /// Whether the program accepts new distributions; defaults to true.
    pub active: Option<bool>,
}

/// Validated program fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramDraft {
    /// Program name.
    pub name: String,
    /// Program type.
    pub program_type: String,
    /// Description.
    pub description: Option<String>,
    /// Active flag.
    pub active: bool,
}

impl ProgramInput {
    /// Validates the payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every failing field.
    pub fn into_draft(self) -> Result<ProgramDraft, AppError> {
        let violations = declared_violations(&self);
        if !violations.is_empty() {
            return Err(finish(violations));
        }
        Ok(ProgramDraft {
            name: self.name.trim().to_string(),
            program_type: self.program_type.trim().to_string(),
            description: clean_optional(self.description),
            active: self.active.unwrap_or(true),
        })
    }
}

// ============================================================================
// Users
// ============================================================================

/// Self-registration payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterInput {
    /// Login email.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    pub password: String,
    /// Display name.
    #[validate(custom(function = "not_blank"))]
    pub full_name: String,
}

/// Validated registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDraft {
    /// Lower-cased email.
    pub email: String,
    /// Plaintext password, to be hashed by the caller.
    pub password: String,
    /// Display name.
    pub full_name: String,
}

impl RegisterInput {
    /// Validates the payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every failing field.
    pub fn into_draft(self) -> Result<RegisterDraft, AppError> {
        let violations = declared_violations(&self);
        if !violations.is_empty() {
            return Err(finish(violations));
        }
        Ok(RegisterDraft {
            email: self.email.trim().to_lowercase(),
            password: self.password,
            full_name: self.full_name.trim().to_string(),
        })
    }
}

/// Role change payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoleUpdateInput {
    /// New role name.
    pub role: String,
}

impl RoleUpdateInput {
    /// Parses the requested role.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when the role is missing or unknown.
    pub fn into_role(self) -> Result<Role, AppError> {
        let raw = self.role.trim();
        if raw.is_empty() {
            return Err(finish(vec![required("role")]));
        }
        let mut violations = Vec::new();
        parse_one_of::<Role>("role", raw, &mut violations).ok_or_else(|| finish(violations))
    }
}
