//! Database repositories for the data access layer.
//!
//! Every query is organization-scoped. The repositories are the first
//! enforcement layer for tenancy; Postgres row-level security (see the
//! `migrations/` directory) is the second, so a missing scope predicate here
//! fails closed rather than leaking another organization's rows.

pub mod db;

pub use db::control::{OrganizationRepository, ProfileRepository, UserRoleRepository};
pub use db::site::{
    AttendanceRepository, InspectionRepository, IssueRepository, MaterialRepository,
    NewGoodsReceipt, NewProject, NewPurchaseOrder, NewPurchaseOrderItem, NewStockLine, NewTask,
    NewWorker, ProjectRepository, ProjectUpdate, SafetyRepository, TaskRepository, WorkerRepository,
};
pub use db::request_user::{apply_request_user, request_user, with_request_user};
pub use db::transaction::with_transaction;
