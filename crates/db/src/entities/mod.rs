//! `SeaORM` entity definitions.

pub mod beneficiaries;
pub mod categories;
pub mod distribution_items;
pub mod distributions;
pub mod donors;
pub mod programs;
pub mod receipt_items;
pub mod receipts;
pub mod sea_orm_active_enums;
pub mod users;
