//! Report repository for the income, distribution, balance and history reports.
//!
//! Aggregation runs in SQL; the shaping (grand totals, zero rows for idle
//! buckets, ordering) is done by [`ReportService`].

use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement, Value};
use uuid::Uuid;
use zakat_core::fund::FundBucket;
use zakat_core::reports::{
    BeneficiaryHistory, BeneficiaryHistoryItem, BeneficiaryProfile, DistributionGrouping,
    DistributionSummaryQuery, DistributionSummaryReport, DistributionSummaryRow,
    FundBalanceReport, FundFlow, IncomePeriod, IncomeSummaryQuery, IncomeSummaryReport,
    IncomeSummaryRow, NO_PROGRAM_LABEL, ReportRange, ReportService,
};

use super::RepositoryError;
use crate::{DEFAULT_STATEMENT_TIMEOUT, bounded};

const INCOME_SUMMARY_SQL: &str = r"
SELECT
    TO_CHAR(r.receipt_date, $3) AS period,
    COALESCE(SUM(ri.amount) FILTER (WHERE ri.fund_type = 'zakat' AND ri.zakat_type = 'fitrah'), 0) AS zakat_fitrah,
    COALESCE(SUM(ri.amount) FILTER (WHERE ri.fund_type = 'zakat' AND ri.zakat_type = 'maal'), 0) AS zakat_maal,
    COALESCE(SUM(ri.amount) FILTER (WHERE ri.fund_type = 'infaq'), 0) AS infaq,
    COALESCE(SUM(ri.amount) FILTER (WHERE ri.fund_type = 'sadaqah'), 0) AS sadaqah,
    COALESCE(SUM(ri.amount), 0) AS total
FROM receipts r
JOIN receipt_items ri ON ri.receipt_id = r.id
WHERE ($1::date IS NULL OR r.receipt_date >= $1::date)
  AND ($2::date IS NULL OR r.receipt_date <= $2::date)
GROUP BY 1
ORDER BY 1 ASC
";

const DISTRIBUTION_BY_CATEGORY_SQL: &str = r"
SELECT
    c.id AS group_id,
    c.name AS group_name,
    COUNT(DISTINCT di.beneficiary_id) AS beneficiary_count,
    COALESCE(SUM(di.amount), 0) AS total_amount
FROM distribution_items di
JOIN distributions d ON d.id = di.distribution_id
JOIN beneficiaries b ON b.id = di.beneficiary_id
JOIN categories c ON c.id = b.category_id
WHERE ($1::date IS NULL OR d.distribution_date >= $1::date)
  AND ($2::date IS NULL OR d.distribution_date <= $2::date)
  AND ($3::text IS NULL OR d.source_fund_type::text = $3::text)
GROUP BY c.id, c.name
ORDER BY total_amount DESC, group_name ASC
";

const DISTRIBUTION_BY_PROGRAM_SQL: &str = r"
SELECT
    p.id AS group_id,
    COALESCE(p.name, $4) AS group_name,
    COUNT(DISTINCT di.beneficiary_id) AS beneficiary_count,
    COALESCE(SUM(di.amount), 0) AS total_amount
FROM distribution_items di
JOIN distributions d ON d.id = di.distribution_id
LEFT JOIN programs p ON p.id = d.program_id
WHERE ($1::date IS NULL OR d.distribution_date >= $1::date)
  AND ($2::date IS NULL OR d.distribution_date <= $2::date)
  AND ($3::text IS NULL OR d.source_fund_type::text = $3::text)
GROUP BY p.id, p.name
ORDER BY total_amount DESC, group_name ASC
";

const FUND_INCOME_SQL: &str = r"
SELECT
    CASE
        WHEN ri.fund_type = 'zakat' THEN 'zakat_' || ri.zakat_type::text
        ELSE ri.fund_type::text
    END AS fund_type,
    COALESCE(SUM(ri.amount), 0) AS total
FROM receipt_items ri
JOIN receipts r ON r.id = ri.receipt_id
WHERE ($1::date IS NULL OR r.receipt_date >= $1::date)
  AND ($2::date IS NULL OR r.receipt_date <= $2::date)
GROUP BY 1
";

const FUND_OUTGOING_SQL: &str = r"
SELECT
    d.source_fund_type::text AS fund_type,
    COALESCE(SUM(d.total_amount), 0) AS total
FROM distributions d
WHERE ($1::date IS NULL OR d.distribution_date >= $1::date)
  AND ($2::date IS NULL OR d.distribution_date <= $2::date)
GROUP BY 1
";

const BENEFICIARY_PROFILE_SQL: &str = r"
SELECT b.id, b.name, c.name AS category_name, b.address
FROM beneficiaries b
JOIN categories c ON c.id = b.category_id
WHERE b.id = $1
";

const BENEFICIARY_HISTORY_SQL: &str = r"
SELECT
    d.id AS distribution_id,
    d.distribution_date,
    COALESCE(p.name, $2) AS program_name,
    d.source_fund_type::text AS source_fund_type,
    di.amount
FROM distribution_items di
JOIN distributions d ON d.id = di.distribution_id
LEFT JOIN programs p ON p.id = d.program_id
WHERE di.beneficiary_id = $1
ORDER BY d.distribution_date DESC, d.created_at DESC, di.line_no ASC
";

#[derive(Debug, FromQueryResult)]
struct IncomeRow {
    period: String,
    zakat_fitrah: Decimal,
    zakat_maal: Decimal,
    infaq: Decimal,
    sadaqah: Decimal,
    total: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct GroupRow {
    group_id: Option<Uuid>,
    group_name: String,
    beneficiary_count: i64,
    total_amount: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct BucketTotal {
    fund_type: String,
    total: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct ProfileRow {
    id: Uuid,
    name: String,
    category_name: String,
    address: String,
}

#[derive(Debug, FromQueryResult)]
struct HistoryRow {
    distribution_id: Uuid,
    distribution_date: NaiveDate,
    program_name: String,
    source_fund_type: String,
    amount: Decimal,
}

/// `TO_CHAR` pattern for an income period.
const fn period_format(period: IncomePeriod) -> &'static str {
    match period {
        IncomePeriod::Daily => "YYYY-MM-DD",
        IncomePeriod::Monthly => "YYYY-MM",
    }
}

fn range_values(range: ReportRange) -> Vec<Value> {
    vec![range.date_from.into(), range.date_to.into()]
}

fn parse_bucket(raw: &str) -> Result<FundBucket, RepositoryError> {
    raw.parse()
        .map_err(|e: String| RepositoryError::Database(DbErr::Type(e)))
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            timeout: DEFAULT_STATEMENT_TIMEOUT,
        }
    }

    /// Overrides the per-operation deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Income per period and fund bucket, oldest period first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn income_summary(
        &self,
        query: IncomeSummaryQuery,
    ) -> Result<IncomeSummaryReport, RepositoryError> {
        let mut values = range_values(query.range);
        values.push(period_format(query.period).into());
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, INCOME_SUMMARY_SQL, values);

        let rows = bounded(self.timeout, async {
            Ok(IncomeRow::find_by_statement(stmt).all(&self.db).await?)
        })
        .await?;

        let rows = rows
            .into_iter()
            .map(|r| IncomeSummaryRow {
                period: r.period,
                zakat_fitrah: r.zakat_fitrah,
                zakat_maal: r.zakat_maal,
                infaq: r.infaq,
                sadaqah: r.sadaqah,
                total: r.total,
            })
            .collect();
        Ok(ReportService::income_summary(query.period, rows))
    }

    /// Distribution totals per category or per program, largest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn distribution_summary(
        &self,
        query: DistributionSummaryQuery,
    ) -> Result<DistributionSummaryReport, RepositoryError> {
        let mut values = range_values(query.range);
        values.push(query.source_fund_type.map(|b| b.as_str().to_string()).into());
        let sql = match query.grouping {
            DistributionGrouping::Category => DISTRIBUTION_BY_CATEGORY_SQL,
            DistributionGrouping::Program => {
                values.push(NO_PROGRAM_LABEL.into());
                DISTRIBUTION_BY_PROGRAM_SQL
            }
        };
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, values);

        let rows = bounded(self.timeout, async {
            Ok(GroupRow::find_by_statement(stmt).all(&self.db).await?)
        })
        .await?;

        let rows = rows
            .into_iter()
            .map(|r| DistributionSummaryRow {
                group_id: r.group_id,
                group_name: r.group_name,
                beneficiary_count: r.beneficiary_count,
                total_amount: r.total_amount,
            })
            .collect();
        Ok(ReportService::distribution_summary(query.grouping, rows))
    }

    /// Money in, money out and balance for every fund bucket.
    ///
    /// Buckets with no activity in the range are reported with zeros.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn fund_balance(&self, range: ReportRange) -> Result<FundBalanceReport, RepositoryError> {
        let income = Statement::from_sql_and_values(
            DbBackend::Postgres,
            FUND_INCOME_SQL,
            range_values(range),
        );
        let outgoing = Statement::from_sql_and_values(
            DbBackend::Postgres,
            FUND_OUTGOING_SQL,
            range_values(range),
        );

        let (income, outgoing) = bounded(self.timeout, async {
            let income = BucketTotal::find_by_statement(income).all(&self.db).await?;
            let outgoing = BucketTotal::find_by_statement(outgoing).all(&self.db).await?;
            Ok((income, outgoing))
        })
        .await?;

        let mut flows = Vec::with_capacity(income.len() + outgoing.len());
        for row in income {
            flows.push(FundFlow {
                fund_type: parse_bucket(&row.fund_type)?,
                total_in: row.total,
                total_out: Decimal::ZERO,
            });
        }
        for row in outgoing {
            flows.push(FundFlow {
                fund_type: parse_bucket(&row.fund_type)?,
                total_in: Decimal::ZERO,
                total_out: row.total,
            });
        }
        Ok(ReportService::fund_balance(&flows))
    }

    /// Everything one beneficiary has received, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no beneficiary has this id.
    pub async fn beneficiary_history(&self, id: Uuid) -> Result<BeneficiaryHistory, RepositoryError> {
        let profile = Statement::from_sql_and_values(
            DbBackend::Postgres,
            BENEFICIARY_PROFILE_SQL,
            [id.into()],
        );
        let history = Statement::from_sql_and_values(
            DbBackend::Postgres,
            BENEFICIARY_HISTORY_SQL,
            [id.into(), NO_PROGRAM_LABEL.into()],
        );

        let (profile, rows) = bounded(self.timeout, async {
            let profile = ProfileRow::find_by_statement(profile)
                .one(&self.db)
                .await?
                .ok_or(RepositoryError::NotFound {
                    entity: "beneficiary",
                    id,
                })?;
            let rows = HistoryRow::find_by_statement(history).all(&self.db).await?;
            Ok((profile, rows))
        })
        .await?;

        let items = rows
            .into_iter()
            .map(|r| {
                Ok(BeneficiaryHistoryItem {
                    distribution_id: r.distribution_id,
                    distribution_date: r.distribution_date,
                    program_name: r.program_name,
                    source_fund_type: parse_bucket(&r.source_fund_type)?,
                    amount: r.amount,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        let beneficiary = BeneficiaryProfile {
            id: profile.id,
            name: profile.name,
            category_name: profile.category_name,
            address: profile.address,
        };
        Ok(ReportService::beneficiary_history(beneficiary, items))
    }
}
