//! `SeaORM` Entity for beneficiary categories (asnaf).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::beneficiaries::Entity")]
    Beneficiaries,
}

impl Related<super::beneficiaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Beneficiaries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
