//! Girder Core Library
//!
//! This crate provides the domain models, role/permission table, error types,
//! configuration, and formatting helpers shared across all Girder components.

pub mod access;
pub mod config;
pub mod currency;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use access::{can, role_permissions, Permission, Role};
pub use config::{validate_env, Config};
pub use currency::format_inr;
pub use error::{AppError, ErrorMetadata, LogLevel};
