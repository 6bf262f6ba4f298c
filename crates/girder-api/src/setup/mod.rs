//! Application setup and initialization.
//!
//! Everything that happens between reading the environment and serving the
//! first request lives here, split per concern so each piece can fail with a
//! precise error.

pub mod database;
pub mod routes;
pub mod server;

use crate::external::{HttpPortalClient, HttpTeamProvisioner};
use crate::state::{AppState, DbState};
use anyhow::Result;
use girder_core::Config;
use girder_services::{AccessResolver, ChangeFeed, PgDirectory};
use std::sync::Arc;

/// Initialize the entire application: pool, repositories, access resolver,
/// external function clients, and routes.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let pool = database::setup_database(&config).await?;

    let db = DbState::new(pool);

    let directory = PgDirectory::new(
        db.profiles.clone(),
        db.organizations.clone(),
        db.user_roles.clone(),
    );
    let resolver = AccessResolver::new(directory);

    let portal = Arc::new(HttpPortalClient::new(config.portal_function_url.clone()));
    let team = Arc::new(HttpTeamProvisioner::new(config.team_function_url.clone()));

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        resolver,
        change_feed: Arc::new(ChangeFeed::default()),
        portal,
        team,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
