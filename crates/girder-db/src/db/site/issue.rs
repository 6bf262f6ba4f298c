use girder_core::{
    models::{Issue, IssueSeverity, IssueStatus},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct IssueRepository {
    pool: PgPool,
}

impl IssueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "issues", db.operation = "insert"))]
    pub async fn create(
        &self,
        organization_id: Uuid,
        project_id: Uuid,
        title: &str,
        severity: IssueSeverity,
    ) -> Result<Issue, AppError> {
        let issue = sqlx::query_as::<Postgres, Issue>(
            r#"
            INSERT INTO issues (organization_id, project_id, title, severity, status)
            VALUES ($1, $2, $3, $4, 'open')
            RETURNING id, organization_id, project_id, title, severity, status, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(project_id)
        .bind(title)
        .bind(severity)
        .fetch_one(&self.pool)
        .await?;

        Ok(issue)
    }

    #[tracing::instrument(skip(self), fields(db.table = "issues", db.operation = "select"))]
    pub async fn list(
        &self,
        organization_id: Uuid,
        project_id: Option<Uuid>,
    ) -> Result<Vec<Issue>, AppError> {
        let issues = match project_id {
            Some(pid) => {
                sqlx::query_as::<Postgres, Issue>(
                    "SELECT id, organization_id, project_id, title, severity, status, created_at, updated_at FROM issues WHERE organization_id = $1 AND project_id = $2 ORDER BY created_at DESC",
                )
                .bind(organization_id)
                .bind(pid)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<Postgres, Issue>(
                    "SELECT id, organization_id, project_id, title, severity, status, created_at, updated_at FROM issues WHERE organization_id = $1 ORDER BY created_at DESC",
                )
                .bind(organization_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(issues)
    }

    #[tracing::instrument(skip(self), fields(db.table = "issues", db.operation = "update", db.record_id = %id))]
    pub async fn update_status(
        &self,
        organization_id: Uuid,
        id: Uuid,
        status: IssueStatus,
    ) -> Result<Issue, AppError> {
        let issue = sqlx::query_as::<Postgres, Issue>(
            r#"
            UPDATE issues
            SET status = $3, updated_at = NOW()
            WHERE organization_id = $1 AND id = $2
            RETURNING id, organization_id, project_id, title, severity, status, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Issue not found".to_string()))?;

        Ok(issue)
    }

    #[tracing::instrument(skip(self), fields(db.table = "issues", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, organization_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM issues WHERE organization_id = $1 AND id = $2")
            .bind(organization_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Issue not found".to_string()));
        }

        Ok(())
    }
}
