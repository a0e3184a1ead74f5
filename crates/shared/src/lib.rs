//! Shared types, errors, and configuration for the zakat administration backend.
//!
//! This crate provides common types used across all other crates:
//! - The caller-facing error taxonomy with per-field violations
//! - Pagination types for list endpoints
//! - Roles, JWT claims and the token service
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, Role, TokenType};
pub use config::AppConfig;
pub use error::{AppError, FieldViolation};
pub use jwt::{JwtConfig, JwtError, JwtService};
