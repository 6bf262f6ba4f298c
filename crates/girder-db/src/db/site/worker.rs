use girder_core::{models::Worker, AppError};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Fields for creating a worker, shared by the single-create endpoint and the
/// CSV bulk import.
#[derive(Debug, Clone)]
pub struct NewWorker {
    pub name: String,
    pub trade: Option<String>,
    pub daily_rate: Option<Decimal>,
    pub contractor: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone)]
pub struct WorkerRepository {
    pool: PgPool,
}

impl WorkerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, new), fields(db.table = "workers", db.operation = "insert"))]
    pub async fn create(&self, organization_id: Uuid, new: &NewWorker) -> Result<Worker, AppError> {
        let worker = sqlx::query_as::<Postgres, Worker>(
            r#"
            INSERT INTO workers (organization_id, name, trade, daily_rate, contractor, phone, active)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE)
            RETURNING id, organization_id, name, trade, daily_rate, contractor, phone, active, created_at
            "#,
        )
        .bind(organization_id)
        .bind(&new.name)
        .bind(&new.trade)
        .bind(new.daily_rate)
        .bind(&new.contractor)
        .bind(&new.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(worker)
    }

    /// Bulk insert for CSV import. Only pre-validated rows reach this point;
    /// the whole batch goes in one statement.
    #[tracing::instrument(skip(self, workers), fields(db.table = "workers", db.operation = "insert", rows = workers.len()))]
    pub async fn bulk_insert(
        &self,
        organization_id: Uuid,
        workers: &[NewWorker],
    ) -> Result<u64, AppError> {
        if workers.is_empty() {
            return Ok(0);
        }

        let names: Vec<String> = workers.iter().map(|w| w.name.clone()).collect();
        let trades: Vec<Option<String>> = workers.iter().map(|w| w.trade.clone()).collect();
        let rates: Vec<Option<Decimal>> = workers.iter().map(|w| w.daily_rate).collect();
        let contractors: Vec<Option<String>> =
            workers.iter().map(|w| w.contractor.clone()).collect();
        let phones: Vec<Option<String>> = workers.iter().map(|w| w.phone.clone()).collect();

        let inserted = sqlx::query(
            r#"
            INSERT INTO workers (organization_id, name, trade, daily_rate, contractor, phone, active)
            SELECT $1, name, trade, daily_rate, contractor, phone, TRUE
            FROM UNNEST($2::text[], $3::text[], $4::numeric[], $5::text[], $6::text[])
                AS t(name, trade, daily_rate, contractor, phone)
            "#,
        )
        .bind(organization_id)
        .bind(&names)
        .bind(&trades)
        .bind(&rates)
        .bind(&contractors)
        .bind(&phones)
        .execute(&self.pool)
        .await?;

        Ok(inserted.rows_affected())
    }

    #[tracing::instrument(skip(self), fields(db.table = "workers", db.operation = "select"))]
    pub async fn list(&self, organization_id: Uuid) -> Result<Vec<Worker>, AppError> {
        let workers = sqlx::query_as::<Postgres, Worker>(
            "SELECT id, organization_id, name, trade, daily_rate, contractor, phone, active, created_at FROM workers WHERE organization_id = $1 ORDER BY name ASC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(workers)
    }

    #[tracing::instrument(skip(self), fields(db.table = "workers", db.operation = "update", db.record_id = %id))]
    pub async fn set_active(
        &self,
        organization_id: Uuid,
        id: Uuid,
        active: bool,
    ) -> Result<(), AppError> {
        let updated =
            sqlx::query("UPDATE workers SET active = $3 WHERE organization_id = $1 AND id = $2")
                .bind(organization_id)
                .bind(id)
                .bind(active)
                .execute(&self.pool)
                .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Worker not found".to_string()));
        }

        Ok(())
    }
}
