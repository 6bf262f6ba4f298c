use chrono::NaiveDate;
use girder_core::{
    models::{Project, ProjectStatus},
    AppError,
};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Fields for creating a project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub status: ProjectStatus,
    pub budget: Decimal,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Partial update; `None` leaves the column untouched. `end_date` is
/// double-optional to distinguish "no change" from "clear the date".
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub budget: Option<Decimal>,
    pub spent: Option<Decimal>,
    pub end_date: Option<Option<NaiveDate>>,
}

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, new), fields(db.table = "projects", db.operation = "insert"))]
    pub async fn create(
        &self,
        organization_id: Uuid,
        new: &NewProject,
    ) -> Result<Project, AppError> {
        let project = sqlx::query_as::<Postgres, Project>(
            r#"
            INSERT INTO projects (organization_id, name, status, budget, spent, start_date, end_date)
            VALUES ($1, $2, $3, $4, 0, $5, $6)
            RETURNING id, organization_id, name, status, budget, spent, start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(&new.name)
        .bind(new.status)
        .bind(new.budget)
        .bind(new.start_date)
        .bind(new.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, organization_id: Uuid, id: Uuid) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<Postgres, Project>(
            "SELECT id, organization_id, name, status, budget, spent, start_date, end_date, created_at, updated_at FROM projects WHERE organization_id = $1 AND id = $2",
        )
        .bind(organization_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "select"))]
    pub async fn list(&self, organization_id: Uuid) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<Postgres, Project>(
            "SELECT id, organization_id, name, status, budget, spent, start_date, end_date, created_at, updated_at FROM projects WHERE organization_id = $1 ORDER BY created_at DESC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    #[tracing::instrument(skip(self, update), fields(db.table = "projects", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        organization_id: Uuid,
        id: Uuid,
        update: &ProjectUpdate,
    ) -> Result<Project, AppError> {
        let current = self
            .get(organization_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

        let name = update.name.clone().unwrap_or(current.name);
        let status = update.status.unwrap_or(current.status);
        let budget = update.budget.unwrap_or(current.budget);
        let spent = update.spent.unwrap_or(current.spent);
        let end_date = match update.end_date {
            Some(value) => value,
            None => current.end_date,
        };

        let project = sqlx::query_as::<Postgres, Project>(
            r#"
            UPDATE projects
            SET name = $3, status = $4, budget = $5, spent = $6, end_date = $7, updated_at = NOW()
            WHERE organization_id = $1 AND id = $2
            RETURNING id, organization_id, name, status, budget, spent, start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(id)
        .bind(&name)
        .bind(status)
        .bind(budget)
        .bind(spent)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, organization_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM projects WHERE organization_id = $1 AND id = $2")
            .bind(organization_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".to_string()));
        }

        Ok(())
    }
}
