//! Organization and sub-organization endpoints.
//!
//! Sub-organization create/delete is the most restricted surface in the API:
//! both require the caller to be the owner of a top-level organization, and
//! both are enforced here and again by row-level security in Postgres. A
//! sub-organization's own members can never delete it.

use axum::{
    extract::{Path, State},
    response::Json,
};
use girder_core::models::Organization;
use girder_core::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::RequestContext;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use girder_services::ChangeEventType;

#[derive(Debug, Serialize, ToSchema)]
pub struct OrganizationTreeResponse {
    pub organization: Organization,
    /// Direct children; empty for non-owners and for sub-organizations.
    pub sub_organizations: Vec<Organization>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSubOrganizationRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

/// The caller's home organization and its accessible children.
#[utoipa::path(
    get,
    path = "/api/organizations",
    tag = "organizations",
    responses(
        (status = 200, body = OrganizationTreeResponse),
        (status = 404, description = "Home organization missing")
    )
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn get_organization_tree(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
) -> Result<Json<OrganizationTreeResponse>, HttpAppError> {
    let organization = state
        .db
        .organizations
        .get(ctx.home_organization_id)
        .await?
        .ok_or_else(|| {
            AppError::OrganizationNotFound("Home organization not found".to_string())
        })?;

    let sub_organizations = if ctx.is_owner() {
        state
            .db
            .organizations
            .list_children(ctx.home_organization_id)
            .await?
    } else {
        Vec::new()
    };

    Ok(Json(OrganizationTreeResponse {
        organization,
        sub_organizations,
    }))
}

/// Create a sub-organization under the caller's home organization.
#[utoipa::path(
    post,
    path = "/api/organizations/sub",
    tag = "organizations",
    request_body = CreateSubOrganizationRequest,
    responses(
        (status = 200, body = Organization),
        (status = 400, description = "Home organization is itself a sub-organization"),
        (status = 403, description = "Caller is not an owner")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn create_sub_organization(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateSubOrganizationRequest>,
) -> Result<Json<Organization>, HttpAppError> {
    require_top_level_owner(&ctx)?;

    let organization = state
        .db
        .organizations
        .create_sub_organization(ctx.home_organization_id, request.name.trim())
        .await?;

    state.change_feed.publish(
        ctx.home_organization_id,
        ChangeEventType::Insert,
        "organizations",
        organization.id,
    );

    Ok(Json(organization))
}

/// Delete a sub-organization. Cascades to all of its records; irreversible.
#[utoipa::path(
    delete,
    path = "/api/organizations/sub/{id}",
    tag = "organizations",
    params(("id" = Uuid, Path, description = "Sub-organization id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Caller is not the parent organization's owner"),
        (status = 404, description = "Not a child of the caller's organization")
    )
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id, sub_organization_id = %id))]
pub async fn delete_sub_organization(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, HttpAppError> {
    require_top_level_owner(&ctx)?;

    state
        .db
        .organizations
        .delete_sub_organization(ctx.home_organization_id, id)
        .await?;

    state.change_feed.publish(
        ctx.home_organization_id,
        ChangeEventType::Delete,
        "organizations",
        id,
    );

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Sub-organization administration requires owning a top-level organization;
/// neither non-owners nor members of the sub-organization itself qualify.
fn require_top_level_owner(ctx: &RequestContext) -> Result<(), AppError> {
    if !ctx.is_owner() || ctx.organization_id != ctx.home_organization_id {
        return Err(AppError::PermissionDenied(
            "Only the owner of the parent organization can manage sub-organizations".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use girder_core::access::Role;

    fn context(role: Option<Role>, acting_on_home: bool) -> RequestContext {
        let home = Uuid::new_v4();
        let active = if acting_on_home { home } else { Uuid::new_v4() };
        RequestContext {
            user_id: Uuid::new_v4(),
            organization_id: active,
            home_organization_id: home,
            role,
            accessible_organizations: vec![home, active],
        }
    }

    #[test]
    fn owner_on_home_may_manage_sub_organizations() {
        assert!(require_top_level_owner(&context(Some(Role::Owner), true)).is_ok());
    }

    #[test]
    fn non_owners_are_denied() {
        assert!(require_top_level_owner(&context(Some(Role::ProjectManager), true)).is_err());
        assert!(require_top_level_owner(&context(Some(Role::SiteEngineer), true)).is_err());
        assert!(require_top_level_owner(&context(None, true)).is_err());
    }

    #[test]
    fn owner_acting_inside_a_sub_organization_is_denied() {
        // Inherited ownership of a child does not grant managing the child's
        // own children; depth is capped at one level.
        assert!(require_top_level_owner(&context(Some(Role::Owner), false)).is_err());
    }
}
