pub mod attendance;
pub mod inspection;
pub mod issue;
pub mod material;
pub mod project;
pub mod safety;
pub mod task;
pub mod worker;

pub use attendance::AttendanceRepository;
pub use inspection::InspectionRepository;
pub use issue::IssueRepository;
pub use material::{
    MaterialRepository, NewGoodsReceipt, NewPurchaseOrder, NewPurchaseOrderItem, NewStockLine,
};
pub use project::{NewProject, ProjectRepository, ProjectUpdate};
pub use safety::SafetyRepository;
pub use task::{NewTask, TaskRepository};
pub use worker::{NewWorker, WorkerRepository};
