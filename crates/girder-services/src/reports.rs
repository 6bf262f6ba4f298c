//! Report document assembly.
//!
//! Builds the logical structure of each generated document: a title, metadata
//! lines, then sections in a fixed order with tabular rows. Section order is
//! part of the document contract and never depends on input ordering. Actual
//! rendering (PDF or otherwise) happens behind [`ReportRenderer`]; this module
//! owns content and formatting only.

use chrono::NaiveDate;
use girder_core::currency::format_inr;
use girder_core::models::{
    GoodsReceipt, PurchaseOrder, PurchaseOrderItem, StockEntry, Vendor, Worker,
};
use girder_core::AppError;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::payroll::PayrollSummary;
use crate::progress::DailyProgressSummary;

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct ReportSection {
    pub heading: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportSection {
    fn new(heading: &str, columns: &[&str]) -> Self {
        Self {
            heading: heading.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct ReportDocument {
    pub title: String,
    /// Label/value pairs shown under the title, in insertion order.
    pub metadata: Vec<(String, String)>,
    pub sections: Vec<ReportSection>,
}

impl ReportDocument {
    fn new(title: String) -> Self {
        Self {
            title,
            metadata: Vec::new(),
            sections: Vec::new(),
        }
    }

    fn meta(&mut self, label: &str, value: String) {
        self.metadata.push((label.to_string(), value));
    }
}

/// Rendering seam. The concrete renderer is an external collaborator; the
/// service layer only guarantees the document structure it receives.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, AppError>;
}

/// Purchase order document: line items, then totals.
pub fn purchase_order_report(
    order: &PurchaseOrder,
    vendor: &Vendor,
    items: &[PurchaseOrderItem],
) -> ReportDocument {
    let mut doc = ReportDocument::new(format!("Purchase Order {}", order.order_number));
    doc.meta("Vendor", vendor.name.clone());
    doc.meta("Order date", order.ordered_on.to_string());

    let mut line_items = ReportSection::new(
        "Line Items",
        &["Material", "Quantity", "Unit", "Unit Price", "Amount"],
    );
    let mut total = Decimal::ZERO;
    for item in items {
        let amount = item.quantity * item.unit_price;
        total += amount;
        line_items.row(vec![
            item.material_name.clone(),
            item.quantity.to_string(),
            item.unit.clone(),
            format_inr(item.unit_price),
            format_inr(amount),
        ]);
    }
    doc.sections.push(line_items);

    let mut totals = ReportSection::new("Totals", &["Label", "Amount"]);
    totals.row(vec!["Grand Total".to_string(), format_inr(total)]);
    doc.sections.push(totals);

    doc
}

/// Goods receipt note: received stock lines.
pub fn goods_receipt_report(receipt: &GoodsReceipt, entries: &[StockEntry]) -> ReportDocument {
    let mut doc = ReportDocument::new(format!("Goods Receipt {}", receipt.receipt_number));
    doc.meta("Received on", receipt.received_on.to_string());

    let mut received = ReportSection::new("Received Items", &["Material", "Quantity", "Unit"]);
    for entry in entries {
        received.row(vec![
            entry.material_name.clone(),
            entry.quantity.to_string(),
            entry.unit.clone(),
        ]);
    }
    doc.sections.push(received);

    doc
}

/// Daily progress report: tasks, issues, then labour.
pub fn daily_progress_report(summary: &DailyProgressSummary) -> ReportDocument {
    let mut doc = ReportDocument::new(format!("Daily Progress Report — {}", summary.date));
    doc.meta("Date", summary.date.to_string());

    let mut tasks = ReportSection::new("Tasks", &["Metric", "Count"]);
    tasks.row(vec![
        "In progress".to_string(),
        summary.tasks_in_progress.to_string(),
    ]);
    tasks.row(vec![
        "Completed today".to_string(),
        summary.tasks_completed_today.to_string(),
    ]);
    tasks.row(vec!["Blocked".to_string(), summary.tasks_blocked.to_string()]);
    doc.sections.push(tasks);

    let mut issues = ReportSection::new("Issues", &["Metric", "Count"]);
    issues.row(vec!["Open".to_string(), summary.open_issues.to_string()]);
    doc.sections.push(issues);

    let mut labour = ReportSection::new("Labour", &["Metric", "Value"]);
    labour.row(vec![
        "Workers on site".to_string(),
        summary.workers_on_site.to_string(),
    ]);
    labour.row(vec![
        "Labour cost".to_string(),
        format_inr(summary.labour_cost),
    ]);
    doc.sections.push(labour);

    doc
}

/// Payroll report for a period: one row per worker, then totals.
pub fn payroll_report(
    from: NaiveDate,
    to: NaiveDate,
    lines: &[(Worker, PayrollSummary)],
) -> ReportDocument {
    let mut doc = ReportDocument::new("Payroll Report".to_string());
    doc.meta("Period", format!("{} to {}", from, to));

    let mut workers = ReportSection::new(
        "Workers",
        &["Name", "Trade", "Gross", "Deductions", "Net"],
    );
    let mut gross = Decimal::ZERO;
    let mut deductions = Decimal::ZERO;
    let mut net = Decimal::ZERO;
    for (worker, summary) in lines {
        gross += summary.gross_pay;
        deductions += summary.total_deductions;
        net += summary.net_pay;
        workers.row(vec![
            worker.name.clone(),
            worker.trade.clone().unwrap_or_default(),
            format_inr(summary.gross_pay),
            format_inr(summary.total_deductions),
            format_inr(summary.net_pay),
        ]);
    }
    doc.sections.push(workers);

    let mut totals = ReportSection::new("Totals", &["Gross", "Deductions", "Net"]);
    totals.row(vec![format_inr(gross), format_inr(deductions), format_inr(net)]);
    doc.sections.push(totals);

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use girder_core::models::{PurchaseOrderStatus, StockDirection};
    use uuid::Uuid;

    fn vendor() -> Vendor {
        Vendor {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            name: "Sharma Steel Traders".to_string(),
            phone: None,
            created_at: Utc::now(),
        }
    }

    fn order() -> PurchaseOrder {
        PurchaseOrder {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            vendor_id: Uuid::new_v4(),
            project_id: None,
            order_number: "PO-0042".to_string(),
            status: PurchaseOrderStatus::Draft,
            ordered_on: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn item(quantity: i64, unit_price: i64) -> PurchaseOrderItem {
        PurchaseOrderItem {
            id: Uuid::new_v4(),
            purchase_order_id: Uuid::new_v4(),
            material_name: "TMT Bar 12mm".to_string(),
            quantity: Decimal::from(quantity),
            unit: "tonne".to_string(),
            unit_price: Decimal::from(unit_price),
        }
    }

    #[test]
    fn purchase_order_sections_in_fixed_order() {
        let doc = purchase_order_report(&order(), &vendor(), &[item(2, 55_000)]);
        let headings: Vec<&str> = doc.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["Line Items", "Totals"]);
    }

    #[test]
    fn purchase_order_totals_use_indian_grouping() {
        let doc = purchase_order_report(&order(), &vendor(), &[item(2, 55_000)]);
        let totals = &doc.sections[1];
        assert_eq!(totals.rows[0][1], "₹1,10,000");
    }

    #[test]
    fn goods_receipt_lists_received_items() {
        let receipt = GoodsReceipt {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            purchase_order_id: None,
            receipt_number: "GRN-0007".to_string(),
            received_on: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            created_at: Utc::now(),
        };
        let entry = StockEntry {
            id: Uuid::new_v4(),
            organization_id: receipt.organization_id,
            project_id: None,
            goods_receipt_id: Some(receipt.id),
            transfer_id: None,
            material_name: "Cement OPC 53".to_string(),
            quantity: Decimal::from(200),
            unit: "bag".to_string(),
            direction: StockDirection::In,
            created_at: Utc::now(),
        };

        let doc = goods_receipt_report(&receipt, std::slice::from_ref(&entry));
        assert_eq!(doc.sections[0].heading, "Received Items");
        assert_eq!(doc.sections[0].rows[0][0], "Cement OPC 53");
    }

    #[test]
    fn daily_progress_sections_in_fixed_order() {
        let summary = DailyProgressSummary {
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            project_id: None,
            tasks_in_progress: 3,
            tasks_completed_today: 1,
            tasks_blocked: 0,
            open_issues: 2,
            workers_on_site: 14,
            labour_cost: Decimal::from(11_200),
        };
        let doc = daily_progress_report(&summary);
        let headings: Vec<&str> = doc.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["Tasks", "Issues", "Labour"]);
        assert_eq!(doc.sections[2].rows[1][1], "₹11,200");
    }

    #[test]
    fn payroll_report_totals_across_workers() {
        let worker = Worker {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            name: "Ravi Kumar".to_string(),
            trade: Some("Mason".to_string()),
            daily_rate: Some(Decimal::from(800)),
            contractor: None,
            phone: None,
            active: true,
            created_at: Utc::now(),
        };
        let summary = PayrollSummary {
            gross_pay: Decimal::from(2000),
            total_deductions: Decimal::from(50),
            net_pay: Decimal::from(1950),
        };
        let doc = payroll_report(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 7).unwrap(),
            &[(worker, summary)],
        );
        assert_eq!(doc.sections[1].rows[0], vec!["₹2,000", "₹50", "₹1,950"]);
    }
}
