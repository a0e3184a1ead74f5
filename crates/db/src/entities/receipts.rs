//! `SeaORM` Entity for receipts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub donor_id: Uuid,
    #[sea_orm(unique)]
    pub receipt_number: String,
    pub receipt_date: Date,
    pub payment_method: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::donors::Entity",
        from = "Column::DonorId",
        to = "super::donors::Column::Id"
    )]
    Donors,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::receipt_items::Entity")]
    ReceiptItems,
}

impl Related<super::donors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donors.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::receipt_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReceiptItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
