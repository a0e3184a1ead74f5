//! Receipt and distribution inputs.
//!
//! A draft is only produced once the header and every item pass; its
//! `total_amount` is always the sum of the item amounts and cannot be set
//! by the caller.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use zakat_shared::{AppError, FieldViolation};

use super::{
    MAX_AMOUNT, clean_optional, declared_violations, finish, money_amount, not_blank,
    parse_one_of, required, rice_quantity,
};
use crate::fund::{FundBucket, FundType, ZakatType};
use crate::references::Reference;
use crate::totals::{LineAmount, calculate_total};

fn check_total(total: Decimal, violations: &mut Vec<FieldViolation>) {
    if total > MAX_AMOUNT {
        violations.push(FieldViolation::new(
            "items",
            "range",
            "items add up to more than the largest storable amount",
        ));
    }
}

// ============================================================================
// Receipt
// ============================================================================

/// One line of a donation receipt as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ReceiptItemInput {
    /// `zakat`, `infaq` or `sadaqah`.
    #[validate(custom(function = "not_blank"))]
    pub fund_type: String,
    /// `fitrah` or `maal`; required for zakat, ignored otherwise.
    pub zakat_type: Option<String>,
    /// Number of people covered; required for zakat fitrah.
    pub person_count: Option<i32>,
    /// Amount received.
    #[validate(custom(function = "money_amount"))]
    pub amount: Decimal,
    /// Rice paid in kind, in kilograms.
    #[validate(custom(function = "rice_quantity"))]
    pub rice_kg: Option<Decimal>,
    /// Notes.
    pub notes: Option<String>,
}

/// A validated receipt line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptItemDraft {
    /// Fund type.
    pub fund_type: FundType,
    /// Zakat sub-type; `Some` exactly when `fund_type` is zakat.
    pub zakat_type: Option<ZakatType>,
    /// People covered; `Some` exactly for zakat fitrah.
    pub person_count: Option<i32>,
    /// Amount.
    pub amount: Decimal,
    /// Rice in kilograms.
    pub rice_kg: Option<Decimal>,
    /// Notes.
    pub notes: Option<String>,
}

impl LineAmount for ReceiptItemDraft {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl ReceiptItemInput {
    /// Applies the rules that depend on other fields of the same item.
    fn into_draft(
        self,
        index: usize,
        violations: &mut Vec<FieldViolation>,
    ) -> Option<ReceiptItemDraft> {
        let path = |field: &str| format!("items[{index}].{field}");

        if self.fund_type.trim().is_empty() {
            return None;
        }
        let fund_type: FundType = parse_one_of(&path("fund_type"), &self.fund_type, violations)?;

        let (zakat_type, person_count) = match fund_type {
            FundType::Zakat => {
                let Some(raw) = self
                    .zakat_type
                    .as_deref()
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                else {
                    violations.push(required(path("zakat_type")));
                    return None;
                };
                let zakat_type: ZakatType = parse_one_of(&path("zakat_type"), raw, violations)?;
                let person_count = match (zakat_type, self.person_count) {
                    (ZakatType::Fitrah, None) => {
                        violations.push(required(path("person_count")));
                        return None;
                    }
                    (ZakatType::Fitrah, Some(n)) if n < 1 => {
                        let field = path("person_count");
                        violations.push(FieldViolation::new(
                            field.clone(),
                            "range",
                            format!("{field} must be at least 1"),
                        ));
                        return None;
                    }
                    (ZakatType::Fitrah, Some(n)) => Some(n),
                    (ZakatType::Maal, _) => None,
                };
                (Some(zakat_type), person_count)
            }
            FundType::Infaq | FundType::Sadaqah => (None, None),
        };

        Some(ReceiptItemDraft {
            fund_type,
            zakat_type,
            person_count,
            amount: self.amount,
            rice_kg: self.rice_kg,
            notes: clean_optional(self.notes),
        })
    }
}

/// Receipt create/update payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReceiptInput {
    /// Donor the receipt is issued to.
    #[serde(alias = "muzakki_id")]
    #[validate(required(message = "is required"))]
    pub donor_id: Option<Uuid>,
    /// Human-facing receipt number, unique.
    #[validate(
        custom(function = "not_blank"),
        length(max = 50, message = "must be at most 50 characters")
    )]
    pub receipt_number: String,
    /// Date the donation was received.
    #[validate(required(message = "is required"))]
    pub receipt_date: Option<NaiveDate>,
    /// Cash, transfer, ...
    #[validate(
        custom(function = "not_blank"),
        length(max = 50, message = "must be at most 50 characters")
    )]
    pub payment_method: String,
    /// Notes.
    pub notes: Option<String>,
    /// Line items; at least one.
    #[validate(
        length(min = 1, code = "min_items", message = "must contain at least one item"),
        nested
    )]
    pub items: Vec<ReceiptItemInput>,
}

/// A validated receipt ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptDraft {
    /// Donor reference.
    pub donor_id: Uuid,
    /// Receipt number.
    pub receipt_number: String,
    /// Receipt date.
    pub receipt_date: NaiveDate,
    /// Payment method.
    pub payment_method: String,
    /// Notes.
    pub notes: Option<String>,
    /// Items in submitted order.
    pub items: Vec<ReceiptItemDraft>,
    /// Sum of item amounts.
    pub total_amount: Decimal,
}

impl ReceiptDraft {
    /// Foreign rows that must exist before this receipt is written.
    #[must_use]
    pub fn references(&self) -> Vec<Reference> {
        vec![Reference::Donor(self.donor_id)]
    }
}

impl ReceiptInput {
    /// Validates the receipt and all of its items.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every failing field.
    pub fn into_draft(self) -> Result<ReceiptDraft, AppError> {
        let mut violations = declared_violations(&self);

        let mut items = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.into_iter().enumerate() {
            if let Some(draft) = item.into_draft(index, &mut violations) {
                items.push(draft);
            }
        }
        let total_amount = calculate_total(&items);
        check_total(total_amount, &mut violations);

        let (Some(donor_id), Some(receipt_date), true) =
            (self.donor_id, self.receipt_date, violations.is_empty())
        else {
            return Err(finish(violations));
        };

        Ok(ReceiptDraft {
            donor_id,
            receipt_number: self.receipt_number.trim().to_string(),
            receipt_date,
            payment_method: self.payment_method.trim().to_string(),
            notes: clean_optional(self.notes),
            items,
            total_amount,
        })
    }
}

// ============================================================================
// Distribution
// ============================================================================

/// One line of a distribution as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DistributionItemInput {
    /// Receiving beneficiary.
    #[serde(alias = "mustahiq_id")]
    #[validate(required(message = "is required"))]
    pub beneficiary_id: Option<Uuid>,
    /// Amount disbursed.
    #[validate(custom(function = "money_amount"))]
    pub amount: Decimal,
    /// Notes.
    pub notes: Option<String>,
}

/// A validated distribution line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionItemDraft {
    /// Beneficiary reference.
    pub beneficiary_id: Uuid,
    /// Amount.
    pub amount: Decimal,
    /// Notes.
    pub notes: Option<String>,
}

impl LineAmount for DistributionItemDraft {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Distribution create/update payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct DistributionInput {
    /// Date the funds were handed out.
    #[validate(required(message = "is required"))]
    pub distribution_date: Option<NaiveDate>,
    /// Optional program the distribution belongs to.
    pub program_id: Option<Uuid>,
    /// `zakat_fitrah`, `zakat_maal`, `infaq` or `sadaqah`.
    #[validate(custom(function = "not_blank"))]
    pub source_fund_type: String,
    /// Notes.
    pub notes: Option<String>,
    /// Line items; at least one.
    #[validate(
        length(min = 1, code = "min_items", message = "must contain at least one item"),
        nested
    )]
    pub items: Vec<DistributionItemInput>,
}

/// A validated distribution ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionDraft {
    /// Distribution date.
    pub distribution_date: NaiveDate,
    /// Program reference.
    pub program_id: Option<Uuid>,
    /// Bucket the money is drawn from.
    pub source_fund_type: FundBucket,
    /// Notes.
    pub notes: Option<String>,
    /// Items in submitted order.
    pub items: Vec<DistributionItemDraft>,
    /// Sum of item amounts.
    pub total_amount: Decimal,
}

impl DistributionDraft {
    /// Foreign rows that must exist before this distribution is written.
    ///
    /// Program first, then each distinct beneficiary in item order.
    #[must_use]
    pub fn references(&self) -> Vec<Reference> {
        let mut refs: Vec<Reference> = self.program_id.map(Reference::Program).into_iter().collect();
        for item in &self.items {
            let reference = Reference::Beneficiary(item.beneficiary_id);
            if !refs.contains(&reference) {
                refs.push(reference);
            }
        }
        refs
    }
}

impl DistributionInput {
    /// Validates the distribution and all of its items.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every failing field.
    pub fn into_draft(self) -> Result<DistributionDraft, AppError> {
        let mut violations = declared_violations(&self);

        let source_fund_type = if self.source_fund_type.trim().is_empty() {
            None
        } else {
            parse_one_of::<FundBucket>("source_fund_type", &self.source_fund_type, &mut violations)
        };

        let items: Vec<DistributionItemDraft> = self
            .items
            .into_iter()
            .filter_map(|item| {
                Some(DistributionItemDraft {
                    beneficiary_id: item.beneficiary_id?,
                    amount: item.amount,
                    notes: clean_optional(item.notes),
                })
            })
            .collect();
        let total_amount = calculate_total(&items);
        check_total(total_amount, &mut violations);

        let (Some(distribution_date), Some(source_fund_type), true) =
            (self.distribution_date, source_fund_type, violations.is_empty())
        else {
            return Err(finish(violations));
        };

        Ok(DistributionDraft {
            distribution_date,
            program_id: self.program_id,
            source_fund_type,
            notes: clean_optional(self.notes),
            items,
            total_amount,
        })
    }
}
