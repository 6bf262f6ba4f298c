//! Girder service layer.
//!
//! Pure engines (compliance scorecard, daily progress, payroll, CSV import)
//! plus the access-control resolver, report document assembly, and the
//! realtime invalidation feed. Nothing here touches HTTP; the api crate wires
//! these to handlers.

pub mod access;
pub mod compliance;
pub mod import;
pub mod payroll;
pub mod progress;
pub mod realtime;
pub mod reports;

pub use access::{AccessResolver, Directory, PgDirectory};
pub use compliance::{evaluate_compliance, CheckStatus, ComplianceInputs, ComplianceReport, Finding, Severity};
pub use import::{parse_worker_import, worker_import_template, ParsedWorkerRow};
pub use payroll::{attendance_pay, payroll_summary, PayrollSummary};
pub use progress::{daily_progress, DailyProgressSummary};
pub use realtime::{ChangeEvent, ChangeEventType, ChangeFeed};
pub use reports::{
    daily_progress_report, goods_receipt_report, payroll_report, purchase_order_report,
    ReportDocument, ReportRenderer, ReportSection,
};
