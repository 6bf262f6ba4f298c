use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Checklist inspection status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "inspection_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Pending,
    InProgress,
    Completed,
}

/// A checklist inspection scheduled against a project.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Inspection {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub status: InspectionStatus,
    pub scheduled_for: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}
