use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "incident_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Open,
    Investigating,
    Resolved,
    Closed,
}

impl IncidentStatus {
    /// Open and investigating incidents count as unresolved for compliance.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, IncidentStatus::Open | IncidentStatus::Investigating)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SafetyIncident {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub project_id: Uuid,
    pub description: String,
    pub status: IncidentStatus,
    pub occurred_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}
