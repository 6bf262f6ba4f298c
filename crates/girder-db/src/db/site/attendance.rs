use chrono::NaiveDate;
use girder_core::{
    models::{AttendanceRecord, AttendanceStatus},
    AppError,
};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Mark attendance for a worker on a date. Marking the same day twice
    /// updates the existing record (UNIQUE(worker_id, date)).
    #[tracing::instrument(skip(self), fields(db.table = "attendance_records", db.operation = "upsert"))]
    pub async fn mark(
        &self,
        organization_id: Uuid,
        worker_id: Uuid,
        date: NaiveDate,
        status: AttendanceStatus,
        overtime_hours: Option<Decimal>,
        deduction: Decimal,
    ) -> Result<AttendanceRecord, AppError> {
        let worker_exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM workers WHERE id = $1 AND organization_id = $2)",
        )
        .bind(worker_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        if !worker_exists {
            return Err(AppError::NotFound("Worker not found".to_string()));
        }

        let record = sqlx::query_as::<Postgres, AttendanceRecord>(
            r#"
            INSERT INTO attendance_records (organization_id, worker_id, date, status, overtime_hours, deduction)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (worker_id, date)
            DO UPDATE SET status = $4, overtime_hours = $5, deduction = $6
            RETURNING id, organization_id, worker_id, date, status, overtime_hours, deduction, created_at
            "#,
        )
        .bind(organization_id)
        .bind(worker_id)
        .bind(date)
        .bind(status)
        .bind(overtime_hours)
        .bind(deduction)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "attendance_records", db.operation = "select"))]
    pub async fn list_for_date(
        &self,
        organization_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, AttendanceRecord>(
            "SELECT id, organization_id, worker_id, date, status, overtime_hours, deduction, created_at FROM attendance_records WHERE organization_id = $1 AND date = $2",
        )
        .bind(organization_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Records for one worker over an inclusive date range, for payroll.
    #[tracing::instrument(skip(self), fields(db.table = "attendance_records", db.operation = "select"))]
    pub async fn list_for_worker(
        &self,
        organization_id: Uuid,
        worker_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, AttendanceRecord>(
            r#"
            SELECT id, organization_id, worker_id, date, status, overtime_hours, deduction, created_at
            FROM attendance_records
            WHERE organization_id = $1 AND worker_id = $2 AND date BETWEEN $3 AND $4
            ORDER BY date ASC
            "#,
        )
        .bind(organization_id)
        .bind(worker_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
