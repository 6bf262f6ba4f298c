//! Materials and procurement records.
//!
//! Goods receipts and approved transfers always carry their stock entries;
//! the repository layer writes parent and children in one transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Vendor {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "purchase_order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    Draft,
    Issued,
    Received,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub vendor_id: Uuid,
    pub project_id: Option<Uuid>,
    pub order_number: String,
    pub status: PurchaseOrderStatus,
    pub ordered_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseOrderItem {
    pub id: Uuid,
    pub purchase_order_id: Uuid,
    pub material_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct GoodsReceipt {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub purchase_order_id: Option<Uuid>,
    pub receipt_number: String,
    pub received_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "stock_direction", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum StockDirection {
    In,
    Out,
}

/// One stock movement. Receipts produce `In` entries; an approved transfer
/// produces an `Out` at the source and an `In` at the destination.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockEntry {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub project_id: Option<Uuid>,
    pub goods_receipt_id: Option<Uuid>,
    pub transfer_id: Option<Uuid>,
    pub material_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub direction: StockDirection,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "transfer_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryTransfer {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub from_project_id: Uuid,
    pub to_project_id: Uuid,
    pub material_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub status: TransferStatus,
    pub created_at: DateTime<Utc>,
}
