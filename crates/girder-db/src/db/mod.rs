//! Database repositories.
//!
//! Repositories are organized into control/ (organizations, profiles, roles)
//! and site/ (project, labour, and material records). Each repository owns one
//! domain entity and provides CRUD operations and specialized queries.
//
// Control repositories (organizations, profiles, user roles)
pub mod control;
//
// Site repositories (projects, tasks, issues, safety, inspections, labour, materials)
pub mod site;
//
// Request-user propagation for row-level security
pub mod request_user;
//
// Transaction utilities
pub mod transaction;
