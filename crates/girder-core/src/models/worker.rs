use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Labour-roster entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Worker {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub trade: Option<String>,
    /// Missing rate is treated as zero in every payroll calculation.
    pub daily_rate: Option<Decimal>,
    pub contractor: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "attendance_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    Overtime,
}

/// One worker's attendance for one date. UNIQUE(worker_id, date) in storage;
/// marking twice updates in place.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub worker_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub overtime_hours: Option<Decimal>,
    pub deduction: Decimal,
    pub created_at: DateTime<Utc>,
}
