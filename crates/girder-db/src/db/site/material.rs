//! Materials and procurement repository.
//!
//! Every multi-step write here (purchase order + line items, goods receipt +
//! stock entries, transfer approval + out/in entries) runs inside one
//! transaction. A failure partway rolls the whole sequence back; the parent
//! record is never committed without its children.

use chrono::NaiveDate;
use girder_core::{
    models::{
        GoodsReceipt, InventoryTransfer, PurchaseOrder, PurchaseOrderItem, StockEntry,
        TransferStatus, Vendor,
    },
    AppError,
};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::db::transaction::with_transaction;

#[derive(Debug, Clone)]
pub struct NewPurchaseOrderItem {
    pub material_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewPurchaseOrder {
    pub vendor_id: Uuid,
    pub project_id: Option<Uuid>,
    pub order_number: String,
    pub ordered_on: NaiveDate,
    pub items: Vec<NewPurchaseOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewStockLine {
    pub project_id: Option<Uuid>,
    pub material_name: String,
    pub quantity: Decimal,
    pub unit: String,
}

#[derive(Debug, Clone)]
pub struct NewGoodsReceipt {
    pub purchase_order_id: Option<Uuid>,
    pub receipt_number: String,
    pub received_on: NaiveDate,
    pub lines: Vec<NewStockLine>,
}

#[derive(Clone)]
pub struct MaterialRepository {
    pool: PgPool,
}

impl MaterialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a purchase order and its line items atomically.
    #[tracing::instrument(skip(self, new), fields(db.table = "purchase_orders", db.operation = "insert"))]
    pub async fn create_purchase_order(
        &self,
        organization_id: Uuid,
        new: &NewPurchaseOrder,
    ) -> Result<(PurchaseOrder, Vec<PurchaseOrderItem>), AppError> {
        if new.items.is_empty() {
            return Err(AppError::BadRequest(
                "A purchase order needs at least one line item".to_string(),
            ));
        }

        let new = new.clone();
        let result = with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let order = sqlx::query_as::<Postgres, PurchaseOrder>(
                    r#"
                    INSERT INTO purchase_orders (organization_id, vendor_id, project_id, order_number, status, ordered_on)
                    VALUES ($1, $2, $3, $4, 'draft', $5)
                    RETURNING id, organization_id, vendor_id, project_id, order_number, status, ordered_on, created_at
                    "#,
                )
                .bind(organization_id)
                .bind(new.vendor_id)
                .bind(new.project_id)
                .bind(&new.order_number)
                .bind(new.ordered_on)
                .fetch_one(&mut **tx)
                .await?;

                let mut items = Vec::with_capacity(new.items.len());
                for line in &new.items {
                    let item = sqlx::query_as::<Postgres, PurchaseOrderItem>(
                        r#"
                        INSERT INTO purchase_order_items (purchase_order_id, material_name, quantity, unit, unit_price)
                        VALUES ($1, $2, $3, $4, $5)
                        RETURNING id, purchase_order_id, material_name, quantity, unit, unit_price
                        "#,
                    )
                    .bind(order.id)
                    .bind(&line.material_name)
                    .bind(line.quantity)
                    .bind(&line.unit)
                    .bind(line.unit_price)
                    .fetch_one(&mut **tx)
                    .await?;
                    items.push(item);
                }

                Ok::<_, sqlx::Error>((order, items))
            })
        })
        .await
        .map_err(AppError::from)?;

        Ok(result)
    }

    /// Create a goods receipt note and its inbound stock entries atomically.
    #[tracing::instrument(skip(self, new), fields(db.table = "goods_receipts", db.operation = "insert"))]
    pub async fn create_goods_receipt(
        &self,
        organization_id: Uuid,
        new: &NewGoodsReceipt,
    ) -> Result<(GoodsReceipt, Vec<StockEntry>), AppError> {
        if new.lines.is_empty() {
            return Err(AppError::BadRequest(
                "A goods receipt needs at least one stock line".to_string(),
            ));
        }

        let new = new.clone();
        let result = with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let receipt = sqlx::query_as::<Postgres, GoodsReceipt>(
                    r#"
                    INSERT INTO goods_receipts (organization_id, purchase_order_id, receipt_number, received_on)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, organization_id, purchase_order_id, receipt_number, received_on, created_at
                    "#,
                )
                .bind(organization_id)
                .bind(new.purchase_order_id)
                .bind(&new.receipt_number)
                .bind(new.received_on)
                .fetch_one(&mut **tx)
                .await?;

                let mut entries = Vec::with_capacity(new.lines.len());
                for line in &new.lines {
                    let entry = sqlx::query_as::<Postgres, StockEntry>(
                        r#"
                        INSERT INTO stock_entries (organization_id, project_id, goods_receipt_id, material_name, quantity, unit, direction)
                        VALUES ($1, $2, $3, $4, $5, $6, 'in')
                        RETURNING id, organization_id, project_id, goods_receipt_id, transfer_id, material_name, quantity, unit, direction, created_at
                        "#,
                    )
                    .bind(organization_id)
                    .bind(line.project_id)
                    .bind(receipt.id)
                    .bind(&line.material_name)
                    .bind(line.quantity)
                    .bind(&line.unit)
                    .fetch_one(&mut **tx)
                    .await?;
                    entries.push(entry);
                }

                Ok::<_, sqlx::Error>((receipt, entries))
            })
        })
        .await
        .map_err(AppError::from)?;

        Ok(result)
    }

    #[tracing::instrument(skip(self), fields(db.table = "inventory_transfers", db.operation = "insert"))]
    pub async fn create_transfer(
        &self,
        organization_id: Uuid,
        from_project_id: Uuid,
        to_project_id: Uuid,
        material_name: &str,
        quantity: Decimal,
        unit: &str,
    ) -> Result<InventoryTransfer, AppError> {
        if from_project_id == to_project_id {
            return Err(AppError::BadRequest(
                "Source and destination projects must differ".to_string(),
            ));
        }

        let transfer = sqlx::query_as::<Postgres, InventoryTransfer>(
            r#"
            INSERT INTO inventory_transfers (organization_id, from_project_id, to_project_id, material_name, quantity, unit, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING id, organization_id, from_project_id, to_project_id, material_name, quantity, unit, status, created_at
            "#,
        )
        .bind(organization_id)
        .bind(from_project_id)
        .bind(to_project_id)
        .bind(material_name)
        .bind(quantity)
        .bind(unit)
        .fetch_one(&self.pool)
        .await?;

        Ok(transfer)
    }

    /// Approve a pending transfer: flips the status and writes the out/in
    /// stock-entry pair in the same transaction. A transfer that is not
    /// pending (already approved, or rejected) is a conflict, which also
    /// makes double approval impossible.
    #[tracing::instrument(skip(self), fields(db.table = "inventory_transfers", db.operation = "update", db.record_id = %transfer_id))]
    pub async fn approve_transfer(
        &self,
        organization_id: Uuid,
        transfer_id: Uuid,
    ) -> Result<InventoryTransfer, AppError> {
        let result = with_transaction(&self.pool, |tx| {
            Box::pin(async move {
                let transfer = sqlx::query_as::<Postgres, InventoryTransfer>(
                    r#"
                    UPDATE inventory_transfers
                    SET status = 'approved'
                    WHERE organization_id = $1 AND id = $2 AND status = 'pending'
                    RETURNING id, organization_id, from_project_id, to_project_id, material_name, quantity, unit, status, created_at
                    "#,
                )
                .bind(organization_id)
                .bind(transfer_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;

                for (project_id, direction) in [
                    (transfer.from_project_id, "out"),
                    (transfer.to_project_id, "in"),
                ] {
                    sqlx::query(
                        r#"
                        INSERT INTO stock_entries (organization_id, project_id, transfer_id, material_name, quantity, unit, direction)
                        VALUES ($1, $2, $3, $4, $5, $6, $7::stock_direction)
                        "#,
                    )
                    .bind(organization_id)
                    .bind(project_id)
                    .bind(transfer.id)
                    .bind(&transfer.material_name)
                    .bind(transfer.quantity)
                    .bind(&transfer.unit)
                    .bind(direction)
                    .execute(&mut **tx)
                    .await?;
                }

                Ok::<_, sqlx::Error>(transfer)
            })
        })
        .await
        .map_err(|e| match e.downcast_ref::<sqlx::Error>() {
            Some(sqlx::Error::RowNotFound) => AppError::Conflict(
                "Transfer not found or not pending".to_string(),
            ),
            _ => AppError::from(e),
        })?;

        debug_assert_eq!(result.status, TransferStatus::Approved);
        Ok(result)
    }

    #[tracing::instrument(skip(self), fields(db.table = "vendors", db.operation = "insert"))]
    pub async fn create_vendor(
        &self,
        organization_id: Uuid,
        name: &str,
        phone: Option<&str>,
    ) -> Result<Vendor, AppError> {
        let vendor = sqlx::query_as::<Postgres, Vendor>(
            r#"
            INSERT INTO vendors (organization_id, name, phone)
            VALUES ($1, $2, $3)
            RETURNING id, organization_id, name, phone, created_at
            "#,
        )
        .bind(organization_id)
        .bind(name)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(vendor)
    }

    #[tracing::instrument(skip(self), fields(db.table = "vendors", db.operation = "select"))]
    pub async fn list_vendors(&self, organization_id: Uuid) -> Result<Vec<Vendor>, AppError> {
        let vendors = sqlx::query_as::<Postgres, Vendor>(
            "SELECT id, organization_id, name, phone, created_at FROM vendors WHERE organization_id = $1 ORDER BY name",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vendors)
    }

    #[tracing::instrument(skip(self), fields(db.table = "vendors", db.operation = "select", db.record_id = %vendor_id))]
    pub async fn get_vendor(
        &self,
        organization_id: Uuid,
        vendor_id: Uuid,
    ) -> Result<Vendor, AppError> {
        let vendor = sqlx::query_as::<Postgres, Vendor>(
            "SELECT id, organization_id, name, phone, created_at FROM vendors WHERE organization_id = $1 AND id = $2",
        )
        .bind(organization_id)
        .bind(vendor_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor not found".to_string()))?;

        Ok(vendor)
    }

    #[tracing::instrument(skip(self), fields(db.table = "purchase_orders", db.operation = "select", db.record_id = %purchase_order_id))]
    pub async fn get_purchase_order(
        &self,
        organization_id: Uuid,
        purchase_order_id: Uuid,
    ) -> Result<PurchaseOrder, AppError> {
        let order = sqlx::query_as::<Postgres, PurchaseOrder>(
            "SELECT id, organization_id, vendor_id, project_id, order_number, status, ordered_on, created_at FROM purchase_orders WHERE organization_id = $1 AND id = $2",
        )
        .bind(organization_id)
        .bind(purchase_order_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase order not found".to_string()))?;

        Ok(order)
    }

    #[tracing::instrument(skip(self), fields(db.table = "purchase_orders", db.operation = "select"))]
    pub async fn list_purchase_orders(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<PurchaseOrder>, AppError> {
        let orders = sqlx::query_as::<Postgres, PurchaseOrder>(
            "SELECT id, organization_id, vendor_id, project_id, order_number, status, ordered_on, created_at FROM purchase_orders WHERE organization_id = $1 ORDER BY ordered_on DESC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    #[tracing::instrument(skip(self), fields(db.table = "purchase_order_items", db.operation = "select"))]
    pub async fn purchase_order_items(
        &self,
        purchase_order_id: Uuid,
    ) -> Result<Vec<PurchaseOrderItem>, AppError> {
        let items = sqlx::query_as::<Postgres, PurchaseOrderItem>(
            "SELECT id, purchase_order_id, material_name, quantity, unit, unit_price FROM purchase_order_items WHERE purchase_order_id = $1",
        )
        .bind(purchase_order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    #[tracing::instrument(skip(self), fields(db.table = "goods_receipts", db.operation = "select", db.record_id = %goods_receipt_id))]
    pub async fn get_goods_receipt(
        &self,
        organization_id: Uuid,
        goods_receipt_id: Uuid,
    ) -> Result<GoodsReceipt, AppError> {
        let receipt = sqlx::query_as::<Postgres, GoodsReceipt>(
            "SELECT id, organization_id, purchase_order_id, receipt_number, received_on, created_at FROM goods_receipts WHERE organization_id = $1 AND id = $2",
        )
        .bind(organization_id)
        .bind(goods_receipt_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Goods receipt not found".to_string()))?;

        Ok(receipt)
    }

    #[tracing::instrument(skip(self), fields(db.table = "stock_entries", db.operation = "select"))]
    pub async fn stock_entries_for_receipt(
        &self,
        organization_id: Uuid,
        goods_receipt_id: Uuid,
    ) -> Result<Vec<StockEntry>, AppError> {
        let entries = sqlx::query_as::<Postgres, StockEntry>(
            "SELECT id, organization_id, project_id, goods_receipt_id, transfer_id, material_name, quantity, unit, direction, created_at FROM stock_entries WHERE organization_id = $1 AND goods_receipt_id = $2",
        )
        .bind(organization_id)
        .bind(goods_receipt_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
