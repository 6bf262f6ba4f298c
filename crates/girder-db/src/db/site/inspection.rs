use chrono::NaiveDate;
use girder_core::{
    models::{Inspection, InspectionStatus},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct InspectionRepository {
    pool: PgPool,
}

impl InspectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "inspections", db.operation = "insert"))]
    pub async fn create(
        &self,
        organization_id: Uuid,
        project_id: Uuid,
        title: &str,
        scheduled_for: Option<NaiveDate>,
    ) -> Result<Inspection, AppError> {
        let inspection = sqlx::query_as::<Postgres, Inspection>(
            r#"
            INSERT INTO inspections (organization_id, project_id, title, status, scheduled_for)
            VALUES ($1, $2, $3, 'pending', $4)
            RETURNING id, organization_id, project_id, title, status, scheduled_for, created_at
            "#,
        )
        .bind(organization_id)
        .bind(project_id)
        .bind(title)
        .bind(scheduled_for)
        .fetch_one(&self.pool)
        .await?;

        Ok(inspection)
    }

    #[tracing::instrument(skip(self), fields(db.table = "inspections", db.operation = "select"))]
    pub async fn list(&self, organization_id: Uuid) -> Result<Vec<Inspection>, AppError> {
        let inspections = sqlx::query_as::<Postgres, Inspection>(
            "SELECT id, organization_id, project_id, title, status, scheduled_for, created_at FROM inspections WHERE organization_id = $1 ORDER BY created_at DESC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(inspections)
    }

    #[tracing::instrument(skip(self), fields(db.table = "inspections", db.operation = "update", db.record_id = %id))]
    pub async fn update_status(
        &self,
        organization_id: Uuid,
        id: Uuid,
        status: InspectionStatus,
    ) -> Result<Inspection, AppError> {
        let inspection = sqlx::query_as::<Postgres, Inspection>(
            r#"
            UPDATE inspections
            SET status = $3
            WHERE organization_id = $1 AND id = $2
            RETURNING id, organization_id, project_id, title, status, scheduled_for, created_at
            "#,
        )
        .bind(organization_id)
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Inspection not found".to_string()))?;

        Ok(inspection)
    }
}
