//! Labour roster endpoints, including CSV bulk import.
//!
//! Import is two endpoints: a template download with a fixed header, and an
//! upload that parses per-row, inserts the valid rows, and echoes every row
//! back with its validation state so the client can show a review screen.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Json},
};
use girder_core::access::Permission;
use girder_core::models::Worker;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::RequestContext;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use girder_db::NewWorker;
use girder_services::{parse_worker_import, worker_import_template, ChangeEventType, ParsedWorkerRow};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWorkerRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub trade: Option<String>,
    pub daily_rate: Option<Decimal>,
    pub contractor: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetWorkerActiveRequest {
    pub active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ImportWorkersRequest {
    /// Raw CSV file content, as uploaded.
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportWorkersResponse {
    pub imported: u64,
    pub skipped: usize,
    pub rows: Vec<ParsedWorkerRow>,
}

#[utoipa::path(
    get,
    path = "/api/workers",
    tag = "labour",
    responses((status = 200, body = [Worker]))
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id))]
pub async fn list_workers(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Worker>>, HttpAppError> {
    let workers = state.db.workers.list(ctx.organization_id).await?;
    Ok(Json(workers))
}

#[utoipa::path(
    post,
    path = "/api/workers",
    tag = "labour",
    request_body = CreateWorkerRequest,
    responses(
        (status = 200, body = Worker),
        (status = 403, description = "Missing workers:manage permission")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id))]
pub async fn create_worker(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateWorkerRequest>,
) -> Result<Json<Worker>, HttpAppError> {
    ctx.require(Permission::WorkersManage)?;

    let worker = state
        .db
        .workers
        .create(
            ctx.organization_id,
            &NewWorker {
                name: request.name,
                trade: request.trade,
                daily_rate: request.daily_rate,
                contractor: request.contractor,
                phone: request.phone,
            },
        )
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Insert,
        "workers",
        worker.id,
    );

    Ok(Json(worker))
}

/// Download the CSV import template.
#[utoipa::path(
    get,
    path = "/api/workers/import/template",
    tag = "labour",
    responses((status = 200, description = "CSV template", content_type = "text/csv"))
)]
pub async fn download_import_template(_ctx: RequestContext) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"workers_import_template.csv\"",
            ),
        ],
        worker_import_template(),
    )
}

/// Bulk import workers from an uploaded CSV. Valid rows are inserted in one
/// batch; invalid rows are skipped and returned with their first error.
#[utoipa::path(
    post,
    path = "/api/workers/import",
    tag = "labour",
    request_body = ImportWorkersRequest,
    responses(
        (status = 200, body = ImportWorkersResponse),
        (status = 403, description = "Missing workers:manage permission")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id))]
pub async fn import_workers(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ImportWorkersRequest>,
) -> Result<Json<ImportWorkersResponse>, HttpAppError> {
    ctx.require(Permission::WorkersManage)?;

    let rows = parse_worker_import(&request.content);
    let valid: Vec<NewWorker> = rows
        .iter()
        .filter(|row| row.is_valid())
        .cloned()
        .map(ParsedWorkerRow::into_new_worker)
        .collect();
    let skipped = rows.len() - valid.len();

    let imported = state
        .db
        .workers
        .bulk_insert(ctx.organization_id, &valid)
        .await?;

    tracing::info!(imported, skipped, "Worker CSV import finished");

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Insert,
        "workers",
        Uuid::nil(),
    );

    Ok(Json(ImportWorkersResponse {
        imported,
        skipped,
        rows,
    }))
}

#[utoipa::path(
    patch,
    path = "/api/workers/{id}/active",
    tag = "labour",
    params(("id" = Uuid, Path, description = "Worker id")),
    request_body = SetWorkerActiveRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not found")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id, worker_id = %id))]
pub async fn set_worker_active(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    axum::Json(request): axum::Json<SetWorkerActiveRequest>,
) -> Result<Json<serde_json::Value>, HttpAppError> {
    ctx.require(Permission::WorkersManage)?;

    state
        .db
        .workers
        .set_active(ctx.organization_id, id, request.active)
        .await?;

    state
        .change_feed
        .publish(ctx.organization_id, ChangeEventType::Update, "workers", id);

    Ok(Json(serde_json::json!({ "active": request.active })))
}
