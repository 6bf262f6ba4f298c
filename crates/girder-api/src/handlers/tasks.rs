//! Task endpoints.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::NaiveDate;
use girder_core::access::Permission;
use girder_core::models::{Task, TaskStatus};
use girder_db::NewTask;
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
pub struct TaskListQuery {
    pub project_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    pub project_id: Uuid,
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    /// `null` clears the due date; omitting the field leaves it unchanged.
    #[serde(default, deserialize_with = "super::double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub due_date: Option<Option<NaiveDate>>,
}

#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "tasks",
    params(TaskListQuery),
    responses((status = 200, body = [Task]))
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id))]
pub async fn list_tasks(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<Task>>, HttpAppError> {
    let tasks = state
        .db
        .tasks
        .list(ctx.organization_id, query.project_id)
        .await?;
    Ok(Json(tasks))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 200, body = Task),
        (status = 403, description = "Missing tasks:create permission"),
        (status = 404, description = "Project not found")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id))]
pub async fn create_task(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateTaskRequest>,
) -> Result<Json<Task>, HttpAppError> {
    ctx.require(Permission::TasksCreate)?;

    let task = state
        .db
        .tasks
        .create(
            ctx.organization_id,
            &NewTask {
                project_id: request.project_id,
                title: request.title,
                status: request.status.unwrap_or(TaskStatus::Todo),
                due_date: request.due_date,
            },
        )
        .await?;

    state
        .change_feed
        .publish(ctx.organization_id, ChangeEventType::Insert, "tasks", task.id);

    Ok(Json(task))
}

#[utoipa::path(
    patch,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Task id")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, body = Task),
        (status = 403, description = "Missing tasks:edit permission"),
        (status = 404, description = "Not found")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id, task_id = %id))]
pub async fn update_task(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTaskRequest>,
) -> Result<Json<Task>, HttpAppError> {
    ctx.require(Permission::TasksEdit)?;

    let task = state
        .db
        .tasks
        .update(
            ctx.organization_id,
            id,
            request.title.as_deref(),
            request.status,
            request.due_date,
        )
        .await?;

    state
        .change_feed
        .publish(ctx.organization_id, ChangeEventType::Update, "tasks", task.id);

    Ok(Json(task))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Missing tasks:delete permission"),
        (status = 404, description = "Not found")
    )
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id, task_id = %id))]
pub async fn delete_task(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, HttpAppError> {
    ctx.require(Permission::TasksDelete)?;

    state.db.tasks.delete(ctx.organization_id, id).await?;

    state
        .change_feed
        .publish(ctx.organization_id, ChangeEventType::Delete, "tasks", id);

    Ok(Json(serde_json::json!({ "deleted": true })))
}
