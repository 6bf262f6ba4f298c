//! Girder API Library
//!
//! This crate provides the HTTP API handlers, auth middleware, external
//! function clients, and application setup.

mod api_doc;
mod handlers;
mod telemetry;

pub mod auth;
pub mod error;
pub mod external;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
