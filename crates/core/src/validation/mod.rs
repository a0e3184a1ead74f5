//! Input validation.
//!
//! Inputs derive [`validator::Validate`] for their static rules; the
//! `into_draft` conversions add the conditional rules and enum parsing and
//! hand back typed drafts. Every failure is reported as a
//! [`FieldViolation`] so callers can render per-field messages.

mod inputs;
mod transactions;

#[cfg(test)]
mod tests;

pub use inputs::{
    BeneficiaryDraft, BeneficiaryInput, CategoryDraft, CategoryInput, DonorDraft, DonorInput,
    ProgramDraft, ProgramInput, RegisterDraft, RegisterInput, RoleUpdateInput,
};
pub use transactions::{
    DistributionDraft, DistributionInput, DistributionItemDraft, DistributionItemInput,
    ReceiptDraft, ReceiptInput, ReceiptItemDraft, ReceiptItemInput,
};

use std::borrow::Cow;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};
use zakat_shared::{AppError, FieldViolation};

/// Largest amount a NUMERIC(18,2) column holds: 9,999,999,999,999,999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA763_FFFF, 0x0DE0_B6B3, 0, false, 2);

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "is required"));
    }
    Ok(())
}

/// Largest rice weight a NUMERIC(10,2) column holds: 99,999,999.99 kg.
pub const MAX_RICE_KG: Decimal = Decimal::from_parts(0x540B_E3FF, 0x2, 0, false, 2);

/// Strictly positive, at most two decimal places, no larger than `max`.
fn decimal_within(value: &Decimal, max: Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || value.is_zero() {
        return Err(error("positive", "must be greater than zero"));
    }
    if value.normalize().scale() > 2 {
        return Err(error("scale", "must have at most two decimal places"));
    }
    if *value > max {
        return Err(error("range", "is too large"));
    }
    Ok(())
}

/// Money amounts, sized for NUMERIC(18,2).
pub fn money_amount(value: &Decimal) -> Result<(), ValidationError> {
    decimal_within(value, MAX_AMOUNT)
}

/// Rice weight in kilograms, sized for NUMERIC(10,2).
pub fn rice_quantity(value: &Decimal) -> Result<(), ValidationError> {
    decimal_within(value, MAX_RICE_KG)
}

/// Flattens nested `validator` errors into field paths like `items[2].amount`.
#[must_use]
pub fn collect_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    walk(errors, "", &mut out);
    sort_violations(&mut out);
    out
}

fn walk(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err.message.as_ref().map_or_else(
                        || format!("{path} is invalid"),
                        |m| format!("{path} {m}"),
                    );
                    out.push(FieldViolation::new(path.clone(), err.code.to_string(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => walk(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    walk(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

fn sort_violations(violations: &mut Vec<FieldViolation>) {
    violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.rule.cmp(&b.rule)));
    violations.dedup_by(|a, b| a.field == b.field && a.rule == b.rule);
}

/// Runs the derived rules and returns their violations (empty when valid).
pub(crate) fn declared_violations<T: Validate>(input: &T) -> Vec<FieldViolation> {
    input
        .validate()
        .map_or_else(|errors| collect_violations(&errors), |()| Vec::new())
}

/// Turns accumulated violations into the caller-facing error.
pub(crate) fn finish(mut violations: Vec<FieldViolation>) -> AppError {
    sort_violations(&mut violations);
    AppError::Validation(violations)
}

pub(crate) fn required(field: impl Into<String>) -> FieldViolation {
    let field = field.into();
    let message = format!("{field} is required");
    FieldViolation::new(field, "required", message)
}

/// Parses an enumerated value, recording a `one_of` violation on failure.
pub(crate) fn parse_one_of<T: std::str::FromStr<Err = String>>(
    field: &str,
    raw: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<T> {
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(message) => {
            violations.push(FieldViolation::new(field, "one_of", message));
            None
        }
    }
}

/// Trims an optional free-text field, turning blanks into `None`.
pub(crate) fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Rejects a range whose start is after its end.
///
/// # Errors
///
/// Returns `AppError::Validation` naming `date_from` with rule `date_range`.
pub fn check_date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(), AppError> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(AppError::invalid_field(
            "date_from",
            "date_range",
            format!("date_from {from} is after date_to {to}"),
        )),
        _ => Ok(()),
    }
}

/// Parses an optional enumerated filter value from a query string.
///
/// # Errors
///
/// Returns `AppError::Validation` with rule `one_of` when the value is unknown.
pub fn parse_filter<T: std::str::FromStr<Err = String>>(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<T>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    let mut violations = Vec::new();
    match parse_one_of(field, raw, &mut violations) {
        Some(value) => Ok(Some(value)),
        None => Err(finish(violations)),
    }
}
