//! Report generation service.

use rust_decimal::Decimal;

use super::types::{
    BeneficiaryHistory, BeneficiaryHistoryItem, BeneficiaryProfile, DistributionGrouping,
    DistributionSummaryReport, DistributionSummaryRow, FundBalanceReport, FundBalanceRow,
    FundFlow, IncomePeriod, IncomeSummaryReport, IncomeSummaryRow, IncomeTotals,
};
use crate::fund::FundBucket;
use crate::totals::{LineAmount, calculate_total};

impl LineAmount for BeneficiaryHistoryItem {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Service for shaping aggregate reports.
pub struct ReportService;

impl ReportService {
    /// Adds column totals to per-period income rows.
    #[must_use]
    pub fn income_summary(group_by: IncomePeriod, rows: Vec<IncomeSummaryRow>) -> IncomeSummaryReport {
        let totals = rows.iter().fold(IncomeTotals::default(), |acc, row| IncomeTotals {
            zakat_fitrah: acc.zakat_fitrah + row.zakat_fitrah,
            zakat_maal: acc.zakat_maal + row.zakat_maal,
            infaq: acc.infaq + row.infaq,
            sadaqah: acc.sadaqah + row.sadaqah,
            total: acc.total + row.total,
        });

        IncomeSummaryReport {
            group_by,
            rows,
            totals,
        }
    }

    /// Orders groups by total descending and adds the overall total.
    #[must_use]
    pub fn distribution_summary(
        group_by: DistributionGrouping,
        mut rows: Vec<DistributionSummaryRow>,
    ) -> DistributionSummaryReport {
        rows.sort_by(|a, b| {
            b.total_amount
                .cmp(&a.total_amount)
                .then_with(|| a.group_name.cmp(&b.group_name))
        });
        let total_amount = rows.iter().map(|r| r.total_amount).sum();

        DistributionSummaryReport {
            group_by,
            rows,
            total_amount,
        }
    }

    /// Builds one balance row per bucket, zero where storage had nothing.
    #[must_use]
    pub fn fund_balance(flows: &[FundFlow]) -> FundBalanceReport {
        let rows: Vec<FundBalanceRow> = FundBucket::ALL
            .iter()
            .map(|bucket| {
                let (total_in, total_out) = flows
                    .iter()
                    .filter(|f| f.fund_type == *bucket)
                    .fold((Decimal::ZERO, Decimal::ZERO), |(i, o), f| {
                        (i + f.total_in, o + f.total_out)
                    });
                FundBalanceRow {
                    fund_type: *bucket,
                    total_in,
                    total_out,
                    balance: total_in - total_out,
                }
            })
            .collect();

        let total_in: Decimal = rows.iter().map(|r| r.total_in).sum();
        let total_out: Decimal = rows.iter().map(|r| r.total_out).sum();

        FundBalanceReport {
            rows,
            total_in,
            total_out,
            balance: total_in - total_out,
        }
    }

    /// Attaches the running total to a beneficiary's received lines.
    #[must_use]
    pub fn beneficiary_history(
        beneficiary: BeneficiaryProfile,
        items: Vec<BeneficiaryHistoryItem>,
    ) -> BeneficiaryHistory {
        let total_received = calculate_total(&items);
        BeneficiaryHistory {
            beneficiary,
            items,
            total_received,
        }
    }
}
