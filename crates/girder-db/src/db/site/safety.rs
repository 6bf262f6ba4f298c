use chrono::NaiveDate;
use girder_core::{
    models::{IncidentStatus, SafetyIncident},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct SafetyRepository {
    pool: PgPool,
}

impl SafetyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, description), fields(db.table = "safety_incidents", db.operation = "insert"))]
    pub async fn create(
        &self,
        organization_id: Uuid,
        project_id: Uuid,
        description: &str,
        occurred_on: NaiveDate,
    ) -> Result<SafetyIncident, AppError> {
        let incident = sqlx::query_as::<Postgres, SafetyIncident>(
            r#"
            INSERT INTO safety_incidents (organization_id, project_id, description, status, occurred_on)
            VALUES ($1, $2, $3, 'open', $4)
            RETURNING id, organization_id, project_id, description, status, occurred_on, created_at
            "#,
        )
        .bind(organization_id)
        .bind(project_id)
        .bind(description)
        .bind(occurred_on)
        .fetch_one(&self.pool)
        .await?;

        Ok(incident)
    }

    #[tracing::instrument(skip(self), fields(db.table = "safety_incidents", db.operation = "select"))]
    pub async fn list(&self, organization_id: Uuid) -> Result<Vec<SafetyIncident>, AppError> {
        let incidents = sqlx::query_as::<Postgres, SafetyIncident>(
            "SELECT id, organization_id, project_id, description, status, occurred_on, created_at FROM safety_incidents WHERE organization_id = $1 ORDER BY occurred_on DESC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(incidents)
    }

    #[tracing::instrument(skip(self), fields(db.table = "safety_incidents", db.operation = "update", db.record_id = %id))]
    pub async fn update_status(
        &self,
        organization_id: Uuid,
        id: Uuid,
        status: IncidentStatus,
    ) -> Result<SafetyIncident, AppError> {
        let incident = sqlx::query_as::<Postgres, SafetyIncident>(
            r#"
            UPDATE safety_incidents
            SET status = $3
            WHERE organization_id = $1 AND id = $2
            RETURNING id, organization_id, project_id, description, status, occurred_on, created_at
            "#,
        )
        .bind(organization_id)
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Safety incident not found".to_string()))?;

        Ok(incident)
    }
}
