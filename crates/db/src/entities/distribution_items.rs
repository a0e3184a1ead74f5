//! `SeaORM` Entity for distribution line items.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "distribution_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub distribution_id: Uuid,
    pub line_no: i32,
    pub beneficiary_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::distributions::Entity",
        from = "Column::DistributionId",
        to = "super::distributions::Column::Id",
        on_delete = "Cascade"
    )]
    Distributions,
    #[sea_orm(
        belongs_to = "super::beneficiaries::Entity",
        from = "Column::BeneficiaryId",
        to = "super::beneficiaries::Column::Id"
    )]
    Beneficiaries,
}

impl Related<super::distributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Distributions.def()
    }
}

impl Related<super::beneficiaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Beneficiaries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
