//! Authentication and authorization.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification, with equal cost for unknown accounts
//! - The role-based access policy applied before any handler work

mod password;
mod policy;

pub use password::{PasswordError, hash_password, verify_password, verify_without_account};
pub use policy::{Action, Resource, authorize, is_allowed};
