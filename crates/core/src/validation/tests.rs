//! Tests for input validation.

use rstest::rstest;
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;
use zakat_shared::{AppError, Role};

use super::*;
use crate::fund::{BeneficiaryStatus, FundBucket, FundType, ZakatType};
use crate::references::Reference;

fn violations(err: AppError) -> Vec<(String, String)> {
    err.violations()
        .iter()
        .map(|v| (v.field.clone(), v.rule.clone()))
        .collect()
}

fn has(err: AppError, field: &str, rule: &str) -> bool {
    violations(err)
        .iter()
        .any(|(f, r)| f == field && r == rule)
}

fn receipt(items: serde_json::Value) -> ReceiptInput {
    serde_json::from_value(json!({
        "donor_id": Uuid::new_v4(),
        "receipt_number": "RCP-2026-0001",
        "receipt_date": "2026-03-28",
        "payment_method": "cash",
        "items": items,
    }))
    .unwrap()
}

fn distribution(items: serde_json::Value) -> DistributionInput {
    serde_json::from_value(json!({
        "distribution_date": "2026-04-01",
        "source_fund_type": "zakat_fitrah",
        "items": items,
    }))
    .unwrap()
}

// ============================================================================
// Receipts
// ============================================================================

#[test]
fn test_valid_receipt_computes_total() {
    let draft = receipt(json!([
        {"fund_type": "zakat", "zakat_type": "fitrah", "person_count": 4, "amount": "180000", "rice_kg": "10"},
        {"fund_type": "infaq", "amount": "50000.50"},
    ]))
    .into_draft()
    .unwrap();

    assert_eq!(draft.total_amount, dec!(230000.50));
    assert_eq!(draft.items.len(), 2);
    assert_eq!(draft.items[0].zakat_type, Some(ZakatType::Fitrah));
    assert_eq!(draft.items[0].person_count, Some(4));
    assert_eq!(draft.items[1].fund_type, FundType::Infaq);
    assert_eq!(draft.references(), vec![Reference::Donor(draft.donor_id)]);
}

#[test]
fn test_receipt_without_items_rejected() {
    let err = receipt(json!([])).into_draft().unwrap_err();
    assert!(has(err, "items", "min_items"));
}

#[test]
fn test_receipt_missing_header_fields() {
    let input: ReceiptInput = serde_json::from_value(json!({
        "items": [{"fund_type": "sadaqah", "amount": "1000"}],
    }))
    .unwrap();

    let fields = violations(input.into_draft().unwrap_err());
    for field in ["donor_id", "receipt_date", "receipt_number", "payment_method"] {
        assert!(
            fields.iter().any(|(f, r)| f == field && r == "required"),
            "{field} should be required, got {fields:?}"
        );
    }
}

#[test]
fn test_zakat_requires_zakat_type() {
    let err = receipt(json!([{"fund_type": "zakat", "amount": "1000"}]))
        .into_draft()
        .unwrap_err();
    assert!(has(err, "items[0].zakat_type", "required"));
}

#[rstest]
#[case("infaq")]
#[case("sadaqah")]
fn test_zakat_type_ignored_for_voluntary_funds(#[case] fund_type: &str) {
    let draft = receipt(json!([
        {"fund_type": fund_type, "zakat_type": "not-even-valid", "person_count": 0, "amount": "1000"}
    ]))
    .into_draft()
    .unwrap();

    assert_eq!(draft.items[0].zakat_type, None);
    assert_eq!(draft.items[0].person_count, None);
}

#[test]
fn test_fitrah_requires_person_count() {
    let err = receipt(json!([
        {"fund_type": "zakat", "zakat_type": "fitrah", "amount": "45000"}
    ]))
    .into_draft()
    .unwrap_err();
    assert!(has(err, "items[0].person_count", "required"));

    let err = receipt(json!([
        {"fund_type": "zakat", "zakat_type": "fitrah", "person_count": 0, "amount": "45000"}
    ]))
    .into_draft()
    .unwrap_err();
    assert!(has(err, "items[0].person_count", "range"));
}

#[test]
fn test_maal_drops_person_count() {
    let draft = receipt(json!([
        {"fund_type": "zakat", "zakat_type": "maal", "person_count": 3, "amount": "2500000"}
    ]))
    .into_draft()
    .unwrap();
    assert_eq!(draft.items[0].person_count, None);
    assert_eq!(draft.items[0].zakat_type, Some(ZakatType::Maal));
}

#[rstest]
#[case(json!({"fund_type": "wakaf", "amount": "1000"}), "items[0].fund_type", "one_of")]
#[case(json!({"fund_type": "zakat", "zakat_type": "harta", "amount": "1000"}), "items[0].zakat_type", "one_of")]
#[case(json!({"fund_type": "infaq", "amount": "0"}), "items[0].amount", "positive")]
#[case(json!({"fund_type": "infaq", "amount": "-5"}), "items[0].amount", "positive")]
#[case(json!({"fund_type": "infaq"}), "items[0].amount", "positive")]
#[case(json!({"fund_type": "infaq", "amount": "10.005"}), "items[0].amount", "scale")]
#[case(json!({"fund_type": "infaq", "amount": "100", "rice_kg": "0"}), "items[0].rice_kg", "positive")]
#[case(json!({"fund_type": "infaq", "amount": "100", "rice_kg": "0.001"}), "items[0].rice_kg", "scale")]
#[case(json!({"fund_type": "infaq", "amount": "100", "rice_kg": "2.345"}), "items[0].rice_kg", "scale")]
#[case(json!({"fund_type": "infaq", "amount": "100", "rice_kg": "123456789"}), "items[0].rice_kg", "range")]
#[case(json!({"amount": "100"}), "items[0].fund_type", "required")]
fn test_receipt_item_rules(
    #[case] item: serde_json::Value,
    #[case] field: &str,
    #[case] rule: &str,
) {
    let err = receipt(json!([item])).into_draft().unwrap_err();
    let found = violations(err);
    assert!(
        found.iter().any(|(f, r)| f == field && r == rule),
        "expected {field}/{rule}, got {found:?}"
    );
}

#[test]
fn test_violations_reported_for_every_bad_item() {
    let err = receipt(json!([
        {"fund_type": "infaq", "amount": "100"},
        {"fund_type": "zakat", "amount": "100"},
        {"fund_type": "sadaqah", "amount": "0"},
    ]))
    .into_draft()
    .unwrap_err();

    let fields: Vec<String> = violations(err).into_iter().map(|(f, _)| f).collect();
    assert_eq!(fields, vec!["items[1].zakat_type", "items[2].amount"]);
}

#[test]
fn test_receipt_total_overflow_rejected() {
    let err = receipt(json!([
        {"fund_type": "infaq", "amount": "9999999999999999.99"},
        {"fund_type": "infaq", "amount": "1"},
    ]))
    .into_draft()
    .unwrap_err();
    assert!(has(err, "items", "range"));
}

// ============================================================================
// Distributions
// ============================================================================

#[test]
fn test_distribution_total_and_references() {
    let program_id = Uuid::new_v4();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let mut input = distribution(json!([
        {"beneficiary_id": first, "amount": "150000"},
        {"beneficiary_id": second, "amount": "250000"},
        {"beneficiary_id": first, "amount": "1000"},
    ]));
    input.program_id = Some(program_id);

    let draft = input.into_draft().unwrap();

    assert_eq!(draft.total_amount, dec!(401000));
    assert_eq!(draft.source_fund_type, FundBucket::ZakatFitrah);
    assert_eq!(
        draft.references(),
        vec![
            Reference::Program(program_id),
            Reference::Beneficiary(first),
            Reference::Beneficiary(second),
        ]
    );
}

#[test]
fn test_distribution_rules() {
    let err = distribution(json!([])).into_draft().unwrap_err();
    assert!(has(err, "items", "min_items"));

    let err = distribution(json!([{"amount": "100"}])).into_draft().unwrap_err();
    assert!(has(err, "items[0].beneficiary_id", "required"));

    let mut input = distribution(json!([{"beneficiary_id": Uuid::new_v4(), "amount": "100"}]));
    input.source_fund_type = "zakat".to_string();
    let err = input.into_draft().unwrap_err();
    assert!(has(err, "source_fund_type", "one_of"));

    let mut input = distribution(json!([{"beneficiary_id": Uuid::new_v4(), "amount": "100"}]));
    input.distribution_date = None;
    let err = input.into_draft().unwrap_err();
    assert!(has(err, "distribution_date", "required"));
}

#[test]
fn test_distribution_accepts_legacy_item_key() {
    let id = Uuid::new_v4();
    let draft = distribution(json!([{"mustahiq_id": id, "amount": "75000"}]))
        .into_draft()
        .unwrap();
    assert_eq!(draft.items[0].beneficiary_id, id);
}

// ============================================================================
// Master data
// ============================================================================

#[test]
fn test_donor_trims_and_cleans() {
    let input: DonorInput = serde_json::from_value(json!({
        "name": "  Ahmad  ",
        "phone": "081234567890",
        "address": "Jl. Kenanga 7",
        "notes": "   ",
    }))
    .unwrap();

    let draft = input.into_draft().unwrap();
    assert_eq!(draft.name, "Ahmad");
    assert_eq!(draft.notes, None);
}

#[rstest]
#[case(json!({"phone": "081234567890", "address": "x"}), "name", "required")]
#[case(json!({"name": " ", "phone": "081234567890", "address": "x"}), "name", "required")]
#[case(json!({"name": "A", "phone": "123", "address": "x"}), "phone", "length")]
#[case(json!({"name": "A", "phone": "081234567890"}), "address", "required")]
fn test_donor_rules(#[case] body: serde_json::Value, #[case] field: &str, #[case] rule: &str) {
    let input: DonorInput = serde_json::from_value(body).unwrap();
    assert!(has(input.into_draft().unwrap_err(), field, rule));
}

#[test]
fn test_beneficiary_status_default_and_membership() {
    let category_id = Uuid::new_v4();
    let input: BeneficiaryInput = serde_json::from_value(json!({
        "name": "Siti",
        "phone": "081298765432",
        "address": "Jl. Melati 3",
        "asnaf_id": category_id,
    }))
    .unwrap();
    let draft = input.into_draft().unwrap();
    assert_eq!(draft.status, BeneficiaryStatus::Pending);
    assert_eq!(draft.category_id, category_id);

    let input: BeneficiaryInput = serde_json::from_value(json!({
        "name": "Siti",
        "phone": "081298765432",
        "address": "Jl. Melati 3",
        "category_id": category_id,
        "status": "archived",
    }))
    .unwrap();
    assert!(has(input.into_draft().unwrap_err(), "status", "one_of"));

    let input: BeneficiaryInput = serde_json::from_value(json!({
        "name": "Siti",
        "phone": "081298765432",
        "address": "Jl. Melati 3",
        "status": "active",
    }))
    .unwrap();
    let found = violations(input.into_draft().unwrap_err());
    assert_eq!(found, vec![("category_id".to_string(), "required".to_string())]);
}

#[test]
fn test_program_defaults_active_and_accepts_type_key() {
    let input: ProgramInput = serde_json::from_value(json!({
        "name": "Beasiswa Santri",
        "type": "education",
    }))
    .unwrap();
    let draft = input.into_draft().unwrap();
    assert!(draft.active);
    assert_eq!(draft.program_type, "education");

    let input: ProgramInput = serde_json::from_value(json!({"name": "X"})).unwrap();
    assert!(has(input.into_draft().unwrap_err(), "program_type", "required"));
}

#[test]
fn test_category_requires_name() {
    let input: CategoryInput = serde_json::from_value(json!({"description": "poor"})).unwrap();
    assert!(has(input.into_draft().unwrap_err(), "name", "required"));
}

// ============================================================================
// Users and shared helpers
// ============================================================================

#[test]
fn test_register_rules() {
    let input: RegisterInput = serde_json::from_value(json!({
        "email": "Amil@Example.org",
        "password": "s3cret-pass",
        "full_name": "Amil",
    }))
    .unwrap();
    assert_eq!(input.into_draft().unwrap().email, "amil@example.org");

    let input: RegisterInput = serde_json::from_value(json!({
        "email": "not-an-email",
        "password": "short",
        "full_name": "",
    }))
    .unwrap();
    let found = violations(input.into_draft().unwrap_err());
    assert_eq!(
        found,
        vec![
            ("email".to_string(), "email".to_string()),
            ("full_name".to_string(), "required".to_string()),
            ("password".to_string(), "length".to_string()),
        ]
    );
}

#[rstest]
#[case("admin", Some(Role::Admin))]
#[case("staff", Some(Role::Staff))]
#[case(" viewer ", Some(Role::Viewer))]
#[case("owner", None)]
#[case("", None)]
fn test_role_update(#[case] raw: &str, #[case] expected: Option<Role>) {
    let result = RoleUpdateInput {
        role: raw.to_string(),
    }
    .into_role();
    assert_eq!(result.ok(), expected);
}

#[test]
fn test_date_range_and_filter_parsing() {
    let from = chrono::NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
    let to = chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

    assert!(check_date_range(Some(to), Some(from)).is_ok());
    assert!(check_date_range(Some(from), None).is_ok());
    assert!(has(check_date_range(Some(from), Some(to)).unwrap_err(), "date_from", "date_range"));

    assert_eq!(parse_filter::<FundType>("fund_type", None).unwrap(), None);
    assert_eq!(parse_filter::<FundType>("fund_type", Some("")).unwrap(), None);
    assert_eq!(
        parse_filter::<FundType>("fund_type", Some("zakat")).unwrap(),
        Some(FundType::Zakat)
    );
    assert!(has(
        parse_filter::<FundType>("fund_type", Some("gold")).unwrap_err(),
        "fund_type",
        "one_of"
    ));
}

#[test]
fn test_money_amount_bounds() {
    assert!(money_amount(&dec!(0.01)).is_ok());
    assert!(money_amount(&dec!(1.50)).is_ok());
    assert!(money_amount(&MAX_AMOUNT).is_ok());
    assert_eq!(money_amount(&dec!(0)).unwrap_err().code, "positive");
    assert_eq!(money_amount(&dec!(0.001)).unwrap_err().code, "scale");
    assert_eq!(
        money_amount(&(MAX_AMOUNT + dec!(0.01))).unwrap_err().code,
        "range"
    );
}

#[test]
fn test_rice_quantity_bounds() {
    assert!(rice_quantity(&dec!(2.35)).is_ok());
    assert!(rice_quantity(&dec!(2.350)).is_ok());
    assert!(rice_quantity(&MAX_RICE_KG).is_ok());
    assert_eq!(MAX_RICE_KG, dec!(99999999.99));
    assert_eq!(
        rice_quantity(&(MAX_RICE_KG + dec!(0.01))).unwrap_err().code,
        "range"
    );
}
