//! Aggregate report shaping.
//!
//! This module provides pure business logic for the four fixed reports:
//! - Income summary (per period, pivoted by fund bucket)
//! - Distribution summary (per category or program)
//! - Fund balance (inflow minus outflow per bucket)
//! - Beneficiary history
//!
//! Storage runs the aggregate queries; the service here adds grand totals
//! and guarantees the shapes callers rely on.

pub mod service;
pub mod types;


pub use service::ReportService;
pub use types::*;
