//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zakat_shared::AppError;

use crate::fund::FundBucket;
use crate::validation::{check_date_range, parse_filter};

/// Label used for distributions without a program.
pub const NO_PROGRAM_LABEL: &str = "No Program";

/// Optional inclusive date window shared by every report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportRange {
    /// First day included.
    pub date_from: Option<NaiveDate>,
    /// Last day included.
    pub date_to: Option<NaiveDate>,
}

impl ReportRange {
    /// Builds a range, rejecting `date_from > date_to`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an inverted range.
    pub fn new(date_from: Option<NaiveDate>, date_to: Option<NaiveDate>) -> Result<Self, AppError> {
        check_date_range(date_from, date_to)?;
        Ok(Self { date_from, date_to })
    }
}

/// Calendar bucket for the income summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomePeriod {
    /// One row per day, `YYYY-MM-DD`.
    Daily,
    /// One row per month, `YYYY-MM`.
    #[default]
    Monthly,
}

impl std::str::FromStr for IncomePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!("group_by must be one of: daily, monthly (got '{other}')")),
        }
    }
}

/// Grouping for the distribution summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionGrouping {
    /// By beneficiary category (asnaf).
    #[default]
    #[serde(rename = "asnaf")]
    Category,
    /// By program.
    Program,
}

impl std::str::FromStr for DistributionGrouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asnaf" | "category" => Ok(Self::Category),
            "program" => Ok(Self::Program),
            other => Err(format!("group_by must be one of: asnaf, program (got '{other}')")),
        }
    }
}

/// Parameters of the income summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncomeSummaryQuery {
    /// Date window over receipt dates.
    pub range: ReportRange,
    /// Period granularity.
    pub period: IncomePeriod,
}

impl IncomeSummaryQuery {
    /// Parses raw query-string values.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an unknown `group_by` or an inverted range.
    pub fn parse(
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        group_by: Option<&str>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            range: ReportRange::new(date_from, date_to)?,
            period: parse_filter("group_by", group_by)?.unwrap_or_default(),
        })
    }
}

/// Parameters of the distribution summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistributionSummaryQuery {
    /// Date window over distribution dates.
    pub range: ReportRange,
    /// Grouping.
    pub grouping: DistributionGrouping,
    /// Only distributions drawn from this bucket.
    pub source_fund_type: Option<FundBucket>,
}

impl DistributionSummaryQuery {
    /// Parses raw query-string values.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for unknown values or an inverted range.
    pub fn parse(
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        group_by: Option<&str>,
        source_fund_type: Option<&str>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            range: ReportRange::new(date_from, date_to)?,
            grouping: parse_filter("group_by", group_by)?.unwrap_or_default(),
            source_fund_type: parse_filter("source_fund_type", source_fund_type)?,
        })
    }
}

/// Income for one period, pivoted by bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSummaryRow {
    /// `YYYY-MM-DD` or `YYYY-MM`.
    pub period: String,
    /// Zakat fitrah received.
    pub zakat_fitrah: Decimal,
    /// Zakat maal received.
    pub zakat_maal: Decimal,
    /// Infaq received.
    pub infaq: Decimal,
    /// Sadaqah received.
    pub sadaqah: Decimal,
    /// Everything received in the period.
    pub total: Decimal,
}

/// Column totals of the income summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTotals {
    /// Zakat fitrah.
    pub zakat_fitrah: Decimal,
    /// Zakat maal.
    pub zakat_maal: Decimal,
    /// Infaq.
    pub infaq: Decimal,
    /// Sadaqah.
    pub sadaqah: Decimal,
    /// Grand total.
    pub total: Decimal,
}

/// Income summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeSummaryReport {
    /// Period granularity.
    pub group_by: IncomePeriod,
    /// Rows ordered by period ascending.
    pub rows: Vec<IncomeSummaryRow>,
    /// Column totals.
    pub totals: IncomeTotals,
}

/// One group of the distribution summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSummaryRow {
    /// Category or program id; `None` for the no-program group.
    pub group_id: Option<Uuid>,
    /// Category or program name.
    pub group_name: String,
    /// Distinct beneficiaries reached.
    pub beneficiary_count: i64,
    /// Amount distributed.
    pub total_amount: Decimal,
}

/// Distribution summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionSummaryReport {
    /// Grouping used.
    pub group_by: DistributionGrouping,
    /// Rows ordered by total descending.
    pub rows: Vec<DistributionSummaryRow>,
    /// Sum over all groups.
    pub total_amount: Decimal,
}

/// Raw inflow/outflow of one bucket as aggregated by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundFlow {
    /// Bucket.
    pub fund_type: FundBucket,
    /// Received.
    pub total_in: Decimal,
    /// Distributed.
    pub total_out: Decimal,
}

/// Balance of one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundBalanceRow {
    /// Bucket.
    pub fund_type: FundBucket,
    /// Received.
    pub total_in: Decimal,
    /// Distributed.
    pub total_out: Decimal,
    /// `total_in - total_out`.
    pub balance: Decimal,
}

/// Fund balance report. Always has one row per bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundBalanceReport {
    /// One row per bucket, in bucket order.
    pub rows: Vec<FundBalanceRow>,
    /// Received over all buckets.
    pub total_in: Decimal,
    /// Distributed over all buckets.
    pub total_out: Decimal,
    /// Overall balance.
    pub balance: Decimal,
}

/// Who the history is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficiaryProfile {
    /// Beneficiary id.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Category name.
    pub category_name: String,
    /// Address.
    pub address: String,
}

/// One distribution line received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficiaryHistoryItem {
    /// Distribution the line belongs to.
    pub distribution_id: Uuid,
    /// Distribution date.
    pub distribution_date: NaiveDate,
    /// Program name or [`NO_PROGRAM_LABEL`].
    pub program_name: String,
    /// Bucket the money came from.
    pub source_fund_type: FundBucket,
    /// Amount received.
    pub amount: Decimal,
}

/// Beneficiary history report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeneficiaryHistory {
    /// Beneficiary.
    pub beneficiary: BeneficiaryProfile,
    /// Lines, newest first.
    pub items: Vec<BeneficiaryHistoryItem>,
    /// Sum of all lines.
    pub total_received: Decimal,
}
