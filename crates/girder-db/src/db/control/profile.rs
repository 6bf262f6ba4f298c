use girder_core::{models::Profile, AppError};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for user profiles. A profile pins a user to exactly one home
/// organization; its absence means signup or provisioning has not completed.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "profiles", db.operation = "select"))]
    pub async fn get(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<Postgres, Profile>(
            "SELECT user_id, organization_id, full_name, phone, created_at, updated_at FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Home organization lookup; `None` when no profile row exists
    /// (pre-provisioning race, or signup not completed).
    #[tracing::instrument(skip(self), fields(db.table = "profiles", db.operation = "select"))]
    pub async fn home_organization(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let organization_id = sqlx::query_scalar::<Postgres, Uuid>(
            "SELECT organization_id FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization_id)
    }

    #[tracing::instrument(skip(self), fields(db.table = "profiles", db.operation = "insert"))]
    pub async fn create(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        full_name: &str,
        phone: Option<&str>,
    ) -> Result<Profile, AppError> {
        let profile = sqlx::query_as::<Postgres, Profile>(
            r#"
            INSERT INTO profiles (user_id, organization_id, full_name, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id, organization_id, full_name, phone, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .bind(full_name)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }
}
