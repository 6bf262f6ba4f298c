//! Issue endpoints.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use girder_core::access::Permission;
use girder_core::models::{Issue, IssueSeverity, IssueStatus};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::RequestContext;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use girder_services::ChangeEventType;

#[derive(Debug, Deserialize, IntoParams)]
pub struct IssueListQuery {
    pub project_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIssueRequest {
    pub project_id: Uuid,
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    pub severity: IssueSeverity,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateIssueStatusRequest {
    pub status: IssueStatus,
}

#[utoipa::path(
    get,
    path = "/api/issues",
    tag = "issues",
    params(IssueListQuery),
    responses((status = 200, body = [Issue]))
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id))]
pub async fn list_issues(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Query(query): Query<IssueListQuery>,
) -> Result<Json<Vec<Issue>>, HttpAppError> {
    let issues = state
        .db
        .issues
        .list(ctx.organization_id, query.project_id)
        .await?;
    Ok(Json(issues))
}

#[utoipa::path(
    post,
    path = "/api/issues",
    tag = "issues",
    request_body = CreateIssueRequest,
    responses(
        (status = 200, body = Issue),
        (status = 403, description = "Missing issues:create permission")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id))]
pub async fn create_issue(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateIssueRequest>,
) -> Result<Json<Issue>, HttpAppError> {
    ctx.require(Permission::IssuesCreate)?;

    let issue = state
        .db
        .issues
        .create(
            ctx.organization_id,
            request.project_id,
            &request.title,
            request.severity,
        )
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Insert,
        "issues",
        issue.id,
    );

    Ok(Json(issue))
}

#[utoipa::path(
    patch,
    path = "/api/issues/{id}/status",
    tag = "issues",
    params(("id" = Uuid, Path, description = "Issue id")),
    request_body = UpdateIssueStatusRequest,
    responses(
        (status = 200, body = Issue),
        (status = 403, description = "Missing issues:edit permission"),
        (status = 404, description = "Not found")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id, issue_id = %id))]
pub async fn update_issue_status(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    axum::Json(request): axum::Json<UpdateIssueStatusRequest>,
) -> Result<Json<Issue>, HttpAppError> {
    ctx.require(Permission::IssuesEdit)?;

    let issue = state
        .db
        .issues
        .update_status(ctx.organization_id, id, request.status)
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Update,
        "issues",
        issue.id,
    );

    Ok(Json(issue))
}

#[utoipa::path(
    delete,
    path = "/api/issues/{id}",
    tag = "issues",
    params(("id" = Uuid, Path, description = "Issue id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Missing issues:delete permission"),
        (status = 404, description = "Not found")
    )
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id, issue_id = %id))]
pub async fn delete_issue(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, HttpAppError> {
    ctx.require(Permission::IssuesDelete)?;

    state.db.issues.delete(ctx.organization_id, id).await?;

    state
        .change_feed
        .publish(ctx.organization_id, ChangeEventType::Delete, "issues", id);

    Ok(Json(serde_json::json!({ "deleted": true })))
}
