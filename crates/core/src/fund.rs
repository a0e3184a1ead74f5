//! Fund classification enums.
//!
//! Receipts are itemised by [`FundType`] (plus [`ZakatType`] for zakat);
//! distributions draw from one of four [`FundBucket`]s. Every receipt item
//! maps onto exactly one bucket, which is what the balance report relies on.

use serde::{Deserialize, Serialize};

macro_rules! wire_enum {
    ($name:ident, $what:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the wire and database name.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            /// Comma-separated list of accepted values, for error messages.
            #[must_use]
            pub fn accepted() -> String {
                Self::ALL.iter().map(Self::as_str).collect::<Vec<_>>().join(", ")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(format!(
                        "{} must be one of: {} (got '{other}')",
                        $what,
                        Self::accepted()
                    )),
                }
            }
        }
    };
}

/// Fund type of a receipt item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundType {
    /// Obligatory alms; needs a [`ZakatType`].
    Zakat,
    /// Voluntary spending.
    Infaq,
    /// Voluntary charity.
    Sadaqah,
}

wire_enum!(FundType, "fund_type", {
    Zakat => "zakat",
    Infaq => "infaq",
    Sadaqah => "sadaqah",
});

/// Zakat sub-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZakatType {
    /// Per-person zakat paid at the end of Ramadan.
    Fitrah,
    /// Zakat on wealth.
    Maal,
}

wire_enum!(ZakatType, "zakat_type", {
    Fitrah => "fitrah",
    Maal => "maal",
});

/// The four fund buckets money is tracked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundBucket {
    /// Zakat fitrah.
    ZakatFitrah,
    /// Zakat maal.
    ZakatMaal,
    /// Infaq.
    Infaq,
    /// Sadaqah.
    Sadaqah,
}

wire_enum!(FundBucket, "source_fund_type", {
    ZakatFitrah => "zakat_fitrah",
    ZakatMaal => "zakat_maal",
    Infaq => "infaq",
    Sadaqah => "sadaqah",
});

/// Beneficiary status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeneficiaryStatus {
    /// Receiving distributions.
    Active,
    /// No longer receiving distributions.
    Inactive,
    /// Registered, awaiting review.
    #[default]
    Pending,
}

wire_enum!(BeneficiaryStatus, "status", {
    Active => "active",
    Inactive => "inactive",
    Pending => "pending",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_wire_names_round_trip() {
        for bucket in FundBucket::ALL {
            assert_eq!(FundBucket::from_str(bucket.as_str()).unwrap(), *bucket);
            assert_eq!(
                serde_json::to_value(bucket).unwrap(),
                serde_json::Value::String(bucket.as_str().to_string())
            );
        }
        for status in BeneficiaryStatus::ALL {
            assert_eq!(BeneficiaryStatus::from_str(status.as_str()).unwrap(), *status);
        }
    }

    #[test]
    fn test_unknown_value_lists_accepted() {
        let err = FundType::from_str("wakaf").unwrap_err();
        assert_eq!(
            err,
            "fund_type must be one of: zakat, infaq, sadaqah (got 'wakaf')"
        );
    }

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(BeneficiaryStatus::default(), BeneficiaryStatus::Pending);
    }
}
