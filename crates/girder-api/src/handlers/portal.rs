//! Client portal endpoint.
//!
//! This is the one unauthenticated data route: the portal token is the
//! credential. The upstream function scopes the payload to its grants, so
//! nothing is filtered here.

use axum::{
    extract::{Query, State},
    response::Json,
};
use girder_core::models::PortalData;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct PortalQuery {
    pub token: String,
}

/// Resolve a portal share token into its read-only project slice.
#[utoipa::path(
    get,
    path = "/api/portal",
    tag = "portal",
    params(PortalQuery),
    responses(
        (status = 200, body = PortalData),
        (status = 403, description = "Portal link has expired"),
        (status = 404, description = "Portal link not found")
    )
)]
#[tracing::instrument(skip(state, query))]
pub async fn resolve_portal(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PortalQuery>,
) -> Result<Json<PortalData>, HttpAppError> {
    let data = state.portal.resolve_token(&query.token).await?;
    Ok(Json(data))
}
