//! Postgres enum types and their mapping to the domain enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use zakat_core::fund;
use zakat_shared::Role;

/// `user_role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "staff")]
    Staff,
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

/// `beneficiary_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "beneficiary_status")]
#[serde(rename_all = "snake_case")]
pub enum BeneficiaryStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "pending")]
    Pending,
}

/// `fund_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "fund_type")]
#[serde(rename_all = "snake_case")]
pub enum FundType {
    #[sea_orm(string_value = "zakat")]
    Zakat,
    #[sea_orm(string_value = "infaq")]
    Infaq,
    #[sea_orm(string_value = "sadaqah")]
    Sadaqah,
}

/// `zakat_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "zakat_type")]
#[serde(rename_all = "snake_case")]
pub enum ZakatType {
    #[sea_orm(string_value = "fitrah")]
    Fitrah,
    #[sea_orm(string_value = "maal")]
    Maal,
}

/// `source_fund_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "source_fund_type")]
#[serde(rename_all = "snake_case")]
pub enum SourceFundType {
    #[sea_orm(string_value = "zakat_fitrah")]
    ZakatFitrah,
    #[sea_orm(string_value = "zakat_maal")]
    ZakatMaal,
    #[sea_orm(string_value = "infaq")]
    Infaq,
    #[sea_orm(string_value = "sadaqah")]
    Sadaqah,
}

macro_rules! mirror {
    ($db:ident <=> $($domain:ident)::+ { $($variant:ident),+ $(,)? }) => {
        impl From<$($domain)::+> for $db {
            fn from(value: $($domain)::+) -> Self {
                type Domain = $($domain)::+;
                match value {
                    $(Domain::$variant => Self::$variant),+
                }
            }
        }

        impl From<$db> for $($domain)::+ {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant),+
                }
            }
        }
    };
}

mirror!(UserRole <=> Role { Admin, Staff, Viewer });
mirror!(BeneficiaryStatus <=> fund::BeneficiaryStatus { Active, Inactive, Pending });
mirror!(FundType <=> fund::FundType { Zakat, Infaq, Sadaqah });
mirror!(ZakatType <=> fund::ZakatType { Fitrah, Maal });
mirror!(SourceFundType <=> fund::FundBucket { ZakatFitrah, ZakatMaal, Infaq, Sadaqah });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_bucket_round_trips_through_storage_enum() {
        for bucket in fund::FundBucket::ALL {
            let stored = SourceFundType::from(*bucket);
            assert_eq!(stored.to_value(), bucket.as_str());
            assert_eq!(fund::FundBucket::from(stored), *bucket);
        }
    }

    #[test]
    fn test_role_names_match_storage_values() {
        for role in Role::ALL {
            assert_eq!(UserRole::from(role).to_value(), role.as_str());
        }
    }

    #[test]
    fn test_status_names_match_storage_values() {
        for status in fund::BeneficiaryStatus::ALL {
            assert_eq!(BeneficiaryStatus::from(*status).to_value(), status.as_str());
        }
    }
}
