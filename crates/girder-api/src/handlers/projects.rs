//! Project CRUD endpoints.

use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::NaiveDate;
use girder_core::access::Permission;
use girder_core::models::{Project, ProjectStatus};
use girder_db::{NewProject, ProjectUpdate};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::RequestContext;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use girder_core::AppError;
use girder_services::ChangeEventType;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub status: Option<ProjectStatus>,
    pub budget: Decimal,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub budget: Option<Decimal>,
    pub spent: Option<Decimal>,
    /// `null` clears the end date; omitting the field leaves it unchanged.
    #[serde(default, deserialize_with = "super::double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub end_date: Option<Option<NaiveDate>>,
}

#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "projects",
    responses((status = 200, body = [Project]))
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id))]
pub async fn list_projects(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Project>>, HttpAppError> {
    let projects = state.db.projects.list(ctx.organization_id).await?;
    Ok(Json(projects))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = Uuid, Path, description = "Project id")),
    responses((status = 200, body = Project), (status = 404, description = "Not found"))
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id, project_id = %id))]
pub async fn get_project(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, HttpAppError> {
    let project = state
        .db
        .projects
        .get(ctx.organization_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    Ok(Json(project))
}

#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 200, body = Project),
        (status = 403, description = "Missing projects:create permission")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id))]
pub async fn create_project(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateProjectRequest>,
) -> Result<Json<Project>, HttpAppError> {
    ctx.require(Permission::ProjectsCreate)?;

    let project = state
        .db
        .projects
        .create(
            ctx.organization_id,
            &NewProject {
                name: request.name,
                status: request.status.unwrap_or(ProjectStatus::Planning),
                budget: request.budget,
                start_date: request.start_date,
                end_date: request.end_date,
            },
        )
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Insert,
        "projects",
        project.id,
    );

    Ok(Json(project))
}

#[utoipa::path(
    patch,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, body = Project),
        (status = 403, description = "Missing projects:edit permission"),
        (status = 404, description = "Not found")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id, project_id = %id))]
pub async fn update_project(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateProjectRequest>,
) -> Result<Json<Project>, HttpAppError> {
    ctx.require(Permission::ProjectsEdit)?;

    let project = state
        .db
        .projects
        .update(
            ctx.organization_id,
            id,
            &ProjectUpdate {
                name: request.name,
                status: request.status,
                budget: request.budget,
                spent: request.spent,
                end_date: request.end_date,
            },
        )
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Update,
        "projects",
        project.id,
    );

    Ok(Json(project))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Missing projects:delete permission"),
        (status = 404, description = "Not found")
    )
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id, project_id = %id))]
pub async fn delete_project(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, HttpAppError> {
    ctx.require(Permission::ProjectsDelete)?;

    state.db.projects.delete(ctx.organization_id, id).await?;

    state
        .change_feed
        .publish(ctx.organization_id, ChangeEventType::Delete, "projects", id);

    Ok(Json(serde_json::json!({ "deleted": true })))
}
