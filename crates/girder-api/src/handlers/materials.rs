//! Procurement and inventory endpoints.
//!
//! The multi-record writes (order + items, receipt + stock lines, transfer
//! approval) are atomic at the repository layer; handlers here only enforce
//! permissions and fan out change events.

use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::NaiveDate;
use girder_core::access::Permission;
use girder_core::models::{
    GoodsReceipt, InventoryTransfer, PurchaseOrder, PurchaseOrderItem, StockEntry, Vendor,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::RequestContext;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use girder_db::{NewGoodsReceipt, NewPurchaseOrder, NewPurchaseOrderItem, NewStockLine};
use girder_services::ChangeEventType;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PurchaseOrderItemRequest {
    #[validate(length(min = 1, max = 200))]
    pub material_name: String,
    pub quantity: Decimal,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseOrderRequest {
    pub vendor_id: Uuid,
    pub project_id: Option<Uuid>,
    #[validate(length(min = 1, max = 60))]
    pub order_number: String,
    pub ordered_on: NaiveDate,
    #[validate(nested, length(min = 1))]
    pub items: Vec<PurchaseOrderItemRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseOrderResponse {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub items: Vec<PurchaseOrderItem>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct StockLineRequest {
    pub project_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200))]
    pub material_name: String,
    pub quantity: Decimal,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGoodsReceiptRequest {
    pub purchase_order_id: Option<Uuid>,
    #[validate(length(min = 1, max = 60))]
    pub receipt_number: String,
    pub received_on: NaiveDate,
    #[validate(nested, length(min = 1))]
    pub lines: Vec<StockLineRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GoodsReceiptResponse {
    #[serde(flatten)]
    pub receipt: GoodsReceipt,
    pub entries: Vec<StockEntry>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTransferRequest {
    pub from_project_id: Uuid,
    pub to_project_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub material_name: String,
    pub quantity: Decimal,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
}

#[utoipa::path(
    get,
    path = "/api/vendors",
    tag = "materials",
    responses((status = 200, body = [Vendor]))
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id))]
pub async fn list_vendors(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Vendor>>, HttpAppError> {
    let vendors = state.db.materials.list_vendors(ctx.organization_id).await?;
    Ok(Json(vendors))
}

#[utoipa::path(
    post,
    path = "/api/vendors",
    tag = "materials",
    request_body = CreateVendorRequest,
    responses(
        (status = 200, body = Vendor),
        (status = 403, description = "Missing materials:manage permission")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id))]
pub async fn create_vendor(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateVendorRequest>,
) -> Result<Json<Vendor>, HttpAppError> {
    ctx.require(Permission::MaterialsManage)?;

    let vendor = state
        .db
        .materials
        .create_vendor(ctx.organization_id, &request.name, request.phone.as_deref())
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Insert,
        "vendors",
        vendor.id,
    );

    Ok(Json(vendor))
}

#[utoipa::path(
    get,
    path = "/api/purchase-orders",
    tag = "materials",
    responses((status = 200, body = [PurchaseOrder]))
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id))]
pub async fn list_purchase_orders(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PurchaseOrder>>, HttpAppError> {
    let orders = state
        .db
        .materials
        .list_purchase_orders(ctx.organization_id)
        .await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/api/purchase-orders/{id}",
    tag = "materials",
    params(("id" = Uuid, Path, description = "Purchase order id")),
    responses(
        (status = 200, body = PurchaseOrderResponse),
        (status = 404, description = "Not found")
    )
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id, purchase_order_id = %id))]
pub async fn get_purchase_order(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PurchaseOrderResponse>, HttpAppError> {
    let order = state
        .db
        .materials
        .get_purchase_order(ctx.organization_id, id)
        .await?;
    let items = state.db.materials.purchase_order_items(order.id).await?;
    Ok(Json(PurchaseOrderResponse { order, items }))
}

/// Create a purchase order with its line items in one atomic write.
#[utoipa::path(
    post,
    path = "/api/purchase-orders",
    tag = "materials",
    request_body = CreatePurchaseOrderRequest,
    responses(
        (status = 200, body = PurchaseOrderResponse),
        (status = 400, description = "No line items"),
        (status = 403, description = "Missing materials:manage permission")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id))]
pub async fn create_purchase_order(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreatePurchaseOrderRequest>,
) -> Result<Json<PurchaseOrderResponse>, HttpAppError> {
    ctx.require(Permission::MaterialsManage)?;

    let new = NewPurchaseOrder {
        vendor_id: request.vendor_id,
        project_id: request.project_id,
        order_number: request.order_number,
        ordered_on: request.ordered_on,
        items: request
            .items
            .into_iter()
            .map(|item| NewPurchaseOrderItem {
                material_name: item.material_name,
                quantity: item.quantity,
                unit: item.unit,
                unit_price: item.unit_price,
            })
            .collect(),
    };

    let (order, items) = state
        .db
        .materials
        .create_purchase_order(ctx.organization_id, &new)
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Insert,
        "purchase_orders",
        order.id,
    );

    Ok(Json(PurchaseOrderResponse { order, items }))
}

/// Record a goods receipt note with its inbound stock entries atomically.
#[utoipa::path(
    post,
    path = "/api/goods-receipts",
    tag = "materials",
    request_body = CreateGoodsReceiptRequest,
    responses(
        (status = 200, body = GoodsReceiptResponse),
        (status = 400, description = "No stock lines"),
        (status = 403, description = "Missing materials:manage permission")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id))]
pub async fn create_goods_receipt(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateGoodsReceiptRequest>,
) -> Result<Json<GoodsReceiptResponse>, HttpAppError> {
    ctx.require(Permission::MaterialsManage)?;

    let new = NewGoodsReceipt {
        purchase_order_id: request.purchase_order_id,
        receipt_number: request.receipt_number,
        received_on: request.received_on,
        lines: request
            .lines
            .into_iter()
            .map(|line| NewStockLine {
                project_id: line.project_id,
                material_name: line.material_name,
                quantity: line.quantity,
                unit: line.unit,
            })
            .collect(),
    };

    let (receipt, entries) = state
        .db
        .materials
        .create_goods_receipt(ctx.organization_id, &new)
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Insert,
        "goods_receipts",
        receipt.id,
    );

    Ok(Json(GoodsReceiptResponse { receipt, entries }))
}

/// Request a material transfer between two projects. Stays pending until
/// someone with materials:approve approves it.
#[utoipa::path(
    post,
    path = "/api/transfers",
    tag = "materials",
    request_body = CreateTransferRequest,
    responses(
        (status = 200, body = InventoryTransfer),
        (status = 400, description = "Source and destination are the same project"),
        (status = 403, description = "Missing materials:request permission")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id))]
pub async fn create_transfer(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateTransferRequest>,
) -> Result<Json<InventoryTransfer>, HttpAppError> {
    ctx.require(Permission::MaterialsRequest)?;

    let transfer = state
        .db
        .materials
        .create_transfer(
            ctx.organization_id,
            request.from_project_id,
            request.to_project_id,
            &request.material_name,
            request.quantity,
            &request.unit,
        )
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Insert,
        "inventory_transfers",
        transfer.id,
    );

    Ok(Json(transfer))
}

/// Approve a pending transfer. Writes the out and in stock entries in the
/// same transaction; a second approval of the same transfer is a 409.
#[utoipa::path(
    post,
    path = "/api/transfers/{id}/approve",
    tag = "materials",
    params(("id" = Uuid, Path, description = "Transfer id")),
    responses(
        (status = 200, body = InventoryTransfer),
        (status = 403, description = "Missing materials:approve permission"),
        (status = 409, description = "Transfer not found or not pending")
    )
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id, transfer_id = %id))]
pub async fn approve_transfer(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<InventoryTransfer>, HttpAppError> {
    ctx.require(Permission::MaterialsApprove)?;

    let transfer = state
        .db
        .materials
        .approve_transfer(ctx.organization_id, id)
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Update,
        "inventory_transfers",
        transfer.id,
    );

    Ok(Json(transfer))
}
