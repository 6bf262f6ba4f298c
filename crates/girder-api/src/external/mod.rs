//! Clients for the serverless function boundary.
//!
//! The client-portal and create-team-member functions run outside this
//! service. Each client sits behind a trait so handlers are testable without
//! the network; failures surface as `AppError::ExternalFunction` with no
//! retry and no fallback.

pub mod portal;
pub mod team;

pub use portal::{HttpPortalClient, PortalClient};
pub use team::{HttpTeamProvisioner, TeamProvisioner};
