//! Core business logic for the zakat administration backend.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `fund` - Fund types, zakat sub-types, fund buckets, beneficiary status
//! - `validation` - Input validation producing typed drafts
//! - `totals` - Decimal-exact header totals
//! - `references` - Foreign references a write depends on
//! - `reports` - Report parameters and shaping
//! - `auth` - Password hashing and the role policy

pub mod auth;
pub mod fund;
pub mod references;
pub mod reports;
pub mod totals;
pub mod validation;
