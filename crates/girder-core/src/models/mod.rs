//! Data models for the application
//!
//! This module contains all data structures used throughout the application,
//! organized by domain. Each sub-module represents a specific feature area.

mod inspection;
mod issue;
mod material;
mod organization;
mod portal;
mod project;
mod safety;
mod task;
mod user;
mod worker;

// Re-export all models for convenient imports
pub use inspection::*;
pub use issue::*;
pub use material::*;
pub use organization::*;
pub use portal::*;
pub use project::*;
pub use safety::*;
pub use task::*;
pub use user::*;
pub use worker::*;
