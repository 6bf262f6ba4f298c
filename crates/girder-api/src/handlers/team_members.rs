//! Team membership endpoints.
//!
//! Member provisioning goes through the create-team-member function; this
//! side enforces that only owners provision, and that only the
//! project_manager and site_engineer roles are grantable. Owner is never
//! grantable through this path.

use axum::{
    extract::{Path, State},
    response::Json,
};
use girder_core::access::{Permission, Role};
use girder_core::models::{ProvisionTeamMemberRequest, ProvisionTeamMemberResponse, TeamMember};
use girder_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::RequestContext;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use girder_services::ChangeEventType;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddTeamMemberRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
}

/// List members of the active organization.
#[utoipa::path(
    get,
    path = "/api/team-members",
    tag = "team",
    responses((status = 200, body = [TeamMember]))
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id))]
pub async fn list_team_members(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TeamMember>>, HttpAppError> {
    let members = state.db.user_roles.list_members(ctx.organization_id).await?;
    Ok(Json(members))
}

/// Provision a team member via the external function.
#[utoipa::path(
    post,
    path = "/api/team-members",
    tag = "team",
    request_body = AddTeamMemberRequest,
    responses(
        (status = 200, body = ProvisionTeamMemberResponse),
        (status = 400, description = "Role not grantable, or duplicate membership"),
        (status = 403, description = "Caller is not an owner")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id))]
pub async fn add_team_member(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<AddTeamMemberRequest>,
) -> Result<Json<ProvisionTeamMemberResponse>, HttpAppError> {
    if !ctx.is_owner() {
        return Err(AppError::PermissionDenied(
            "Only owners can add team members".to_string(),
        )
        .into());
    }

    if request.role == Role::Owner {
        return Err(AppError::BadRequest(
            "Only project_manager and site_engineer roles can be granted".to_string(),
        )
        .into());
    }

    let response = state
        .team
        .provision(&ProvisionTeamMemberRequest {
            email: request.email,
            full_name: request.full_name,
            phone: request.phone,
            role: request.role,
            organization_id: ctx.organization_id,
            created_by: ctx.user_id,
        })
        .await?;

    if let Some(user_id) = response.user_id {
        state.change_feed.publish(
            ctx.organization_id,
            ChangeEventType::Insert,
            "user_roles",
            user_id,
        );
    }

    Ok(Json(response))
}

/// Revoke a member's role in the active organization.
#[utoipa::path(
    delete,
    path = "/api/team-members/{user_id}",
    tag = "team",
    params(("user_id" = Uuid, Path, description = "Member's user id")),
    responses(
        (status = 200, description = "Role removed"),
        (status = 403, description = "Missing roles:manage permission")
    )
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id, member = %user_id))]
pub async fn remove_team_member(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, HttpAppError> {
    ctx.require(Permission::RolesManage)?;

    if user_id == ctx.user_id {
        return Err(AppError::BadRequest(
            "Owners cannot remove their own role".to_string(),
        )
        .into());
    }

    state
        .db
        .user_roles
        .remove(user_id, ctx.organization_id)
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Delete,
        "user_roles",
        user_id,
    );

    Ok(Json(serde_json::json!({ "removed": true })))
}
