use chrono::NaiveDate;
use girder_core::{
    models::{Task, TaskStatus},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: Uuid,
    pub title: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, new), fields(db.table = "tasks", db.operation = "insert"))]
    pub async fn create(&self, organization_id: Uuid, new: &NewTask) -> Result<Task, AppError> {
        let project_exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1 AND organization_id = $2)",
        )
        .bind(new.project_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        if !project_exists {
            return Err(AppError::NotFound("Project not found".to_string()));
        }

        let task = sqlx::query_as::<Postgres, Task>(
            r#"
            INSERT INTO tasks (organization_id, project_id, title, status, due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, organization_id, project_id, title, status, due_date, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(new.project_id)
        .bind(&new.title)
        .bind(new.status)
        .bind(new.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    #[tracing::instrument(skip(self), fields(db.table = "tasks", db.operation = "select"))]
    pub async fn list(
        &self,
        organization_id: Uuid,
        project_id: Option<Uuid>,
    ) -> Result<Vec<Task>, AppError> {
        let tasks = match project_id {
            Some(pid) => {
                sqlx::query_as::<Postgres, Task>(
                    "SELECT id, organization_id, project_id, title, status, due_date, created_at, updated_at FROM tasks WHERE organization_id = $1 AND project_id = $2 ORDER BY created_at DESC",
                )
                .bind(organization_id)
                .bind(pid)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<Postgres, Task>(
                    "SELECT id, organization_id, project_id, title, status, due_date, created_at, updated_at FROM tasks WHERE organization_id = $1 ORDER BY created_at DESC",
                )
                .bind(organization_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(tasks)
    }

    #[tracing::instrument(skip(self), fields(db.table = "tasks", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        organization_id: Uuid,
        id: Uuid,
        title: Option<&str>,
        status: Option<TaskStatus>,
        due_date: Option<Option<NaiveDate>>,
    ) -> Result<Task, AppError> {
        let current = sqlx::query_as::<Postgres, Task>(
            "SELECT id, organization_id, project_id, title, status, due_date, created_at, updated_at FROM tasks WHERE organization_id = $1 AND id = $2",
        )
        .bind(organization_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

        let title = title.map(str::to_string).unwrap_or(current.title);
        let status = status.unwrap_or(current.status);
        let due_date = match due_date {
            Some(value) => value,
            None => current.due_date,
        };

        let task = sqlx::query_as::<Postgres, Task>(
            r#"
            UPDATE tasks
            SET title = $3, status = $4, due_date = $5, updated_at = NOW()
            WHERE organization_id = $1 AND id = $2
            RETURNING id, organization_id, project_id, title, status, due_date, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(id)
        .bind(&title)
        .bind(status)
        .bind(due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    #[tracing::instrument(skip(self), fields(db.table = "tasks", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, organization_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM tasks WHERE organization_id = $1 AND id = $2")
            .bind(organization_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Task not found".to_string()));
        }

        Ok(())
    }
}
