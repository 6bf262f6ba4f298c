//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use girder_core::models;
use girder_services::{compliance, import, payroll, progress, reports};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Girder API",
        version = "0.1.0",
        description = "Construction project management API: projects, tasks, issues, site log, labour and payroll, materials and procurement, compliance and progress insights, and a read-only client portal. Organizations can have one level of sub-organizations; the active organization is selected with the X-Organization-Id header."
    ),
    paths(
        // Health
        handlers::health::health,
        // Organizations
        handlers::organizations::get_organization_tree,
        handlers::organizations::create_sub_organization,
        handlers::organizations::delete_sub_organization,
        // Team
        handlers::team_members::list_team_members,
        handlers::team_members::add_team_member,
        handlers::team_members::remove_team_member,
        // Projects
        handlers::projects::list_projects,
        handlers::projects::get_project,
        handlers::projects::create_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,
        // Tasks
        handlers::tasks::list_tasks,
        handlers::tasks::create_task,
        handlers::tasks::update_task,
        handlers::tasks::delete_task,
        // Issues
        handlers::issues::list_issues,
        handlers::issues::create_issue,
        handlers::issues::update_issue_status,
        handlers::issues::delete_issue,
        // Site log
        handlers::site_log::list_incidents,
        handlers::site_log::report_incident,
        handlers::site_log::update_incident_status,
        handlers::site_log::list_inspections,
        handlers::site_log::create_inspection,
        handlers::site_log::update_inspection_status,
        // Labour
        handlers::workers::list_workers,
        handlers::workers::create_worker,
        handlers::workers::download_import_template,
        handlers::workers::import_workers,
        handlers::workers::set_worker_active,
        handlers::attendance::mark_attendance,
        handlers::attendance::list_attendance,
        handlers::attendance::worker_payroll,
        // Materials
        handlers::materials::list_vendors,
        handlers::materials::create_vendor,
        handlers::materials::list_purchase_orders,
        handlers::materials::get_purchase_order,
        handlers::materials::create_purchase_order,
        handlers::materials::create_goods_receipt,
        handlers::materials::create_transfer,
        handlers::materials::approve_transfer,
        // Insights
        handlers::insights::get_compliance_report,
        handlers::insights::get_daily_progress,
        // Reports
        handlers::reports::purchase_order_report_doc,
        handlers::reports::goods_receipt_report_doc,
        handlers::reports::daily_progress_report_doc,
        handlers::reports::payroll_report_doc,
        // Portal
        handlers::portal::resolve_portal,
    ),
    components(
        schemas(
            // Core models
            models::Organization,
            models::Profile,
            models::TeamMember,
            models::Project,
            models::ProjectStatus,
            models::Task,
            models::TaskStatus,
            models::Issue,
            models::IssueSeverity,
            models::IssueStatus,
            models::SafetyIncident,
            models::IncidentStatus,
            models::Inspection,
            models::InspectionStatus,
            models::Worker,
            models::AttendanceRecord,
            models::AttendanceStatus,
            models::Vendor,
            models::PurchaseOrder,
            models::PurchaseOrderStatus,
            models::PurchaseOrderItem,
            models::GoodsReceipt,
            models::StockEntry,
            models::StockDirection,
            models::InventoryTransfer,
            models::TransferStatus,
            models::PortalData,
            models::ProvisionTeamMemberResponse,
            // Engines
            compliance::ComplianceReport,
            compliance::Finding,
            compliance::CheckStatus,
            compliance::Severity,
            progress::DailyProgressSummary,
            payroll::PayrollSummary,
            import::ParsedWorkerRow,
            reports::ReportDocument,
            reports::ReportSection,
            // Request/response bodies
            handlers::organizations::OrganizationTreeResponse,
            handlers::organizations::CreateSubOrganizationRequest,
            handlers::team_members::AddTeamMemberRequest,
            handlers::projects::CreateProjectRequest,
            handlers::projects::UpdateProjectRequest,
            handlers::tasks::CreateTaskRequest,
            handlers::tasks::UpdateTaskRequest,
            handlers::issues::CreateIssueRequest,
            handlers::issues::UpdateIssueStatusRequest,
            handlers::site_log::ReportIncidentRequest,
            handlers::site_log::UpdateIncidentStatusRequest,
            handlers::site_log::CreateInspectionRequest,
            handlers::site_log::UpdateInspectionStatusRequest,
            handlers::workers::CreateWorkerRequest,
            handlers::workers::SetWorkerActiveRequest,
            handlers::workers::ImportWorkersRequest,
            handlers::workers::ImportWorkersResponse,
            handlers::attendance::MarkAttendanceRequest,
            handlers::attendance::WorkerPayrollResponse,
            handlers::materials::CreateVendorRequest,
            handlers::materials::PurchaseOrderItemRequest,
            handlers::materials::CreatePurchaseOrderRequest,
            handlers::materials::PurchaseOrderResponse,
            handlers::materials::StockLineRequest,
            handlers::materials::CreateGoodsReceiptRequest,
            handlers::materials::GoodsReceiptResponse,
            handlers::materials::CreateTransferRequest,
            // Error
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "organizations", description = "Organization tree and sub-organization administration"),
        (name = "team", description = "Team membership and role assignment"),
        (name = "projects", description = "Project CRUD"),
        (name = "tasks", description = "Task CRUD within projects"),
        (name = "issues", description = "Issue tracking"),
        (name = "site-log", description = "Safety incidents and inspection checklists"),
        (name = "labour", description = "Worker roster, CSV import, attendance, and derived payroll"),
        (name = "materials", description = "Vendors, purchase orders, goods receipts, and stock transfers"),
        (name = "insights", description = "Compliance scorecard and daily progress summaries"),
        (name = "reports", description = "Structured report documents"),
        (name = "portal", description = "Read-only client portal resolved from a share token"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_report_document_has_a_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/reports/purchase-orders/{id}",
            "/api/reports/goods-receipts/{id}",
            "/api/reports/daily-progress",
            "/api/reports/payroll",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
