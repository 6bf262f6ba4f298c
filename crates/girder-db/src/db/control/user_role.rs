use girder_core::{
    access::Role,
    models::{TeamMember, UserRole},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for role assignments. At most one role per (user, organization)
/// pair, enforced by a unique constraint.
#[derive(Clone)]
pub struct UserRoleRepository {
    pool: PgPool,
}

impl UserRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Single-row role lookup; `None` means "no permissions" and is not an error.
    #[tracing::instrument(skip(self), fields(db.table = "user_roles", db.operation = "select"))]
    pub async fn role(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_scalar::<Postgres, Role>(
            "SELECT role FROM user_roles WHERE user_id = $1 AND organization_id = $2",
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    #[tracing::instrument(skip(self), fields(db.table = "user_roles", db.operation = "insert"))]
    pub async fn assign(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        role: Role,
    ) -> Result<UserRole, AppError> {
        let assignment = sqlx::query_as::<Postgres, UserRole>(
            r#"
            INSERT INTO user_roles (user_id, organization_id, role)
            VALUES ($1, $2, $3)
            RETURNING user_id, organization_id, role, created_at
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(
                "User already has a role in this organization".to_string(),
            ),
            _ => AppError::from(e),
        })?;

        Ok(assignment)
    }

    #[tracing::instrument(skip(self), fields(db.table = "user_roles", db.operation = "delete"))]
    pub async fn remove(&self, user_id: Uuid, organization_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND organization_id = $2")
            .bind(user_id)
            .bind(organization_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Membership listing: role rows joined with member profiles.
    #[tracing::instrument(skip(self), fields(db.table = "user_roles", db.operation = "select"))]
    pub async fn list_members(&self, organization_id: Uuid) -> Result<Vec<TeamMember>, AppError> {
        let members = sqlx::query_as::<Postgres, TeamMember>(
            r#"
            SELECT ur.user_id, ur.organization_id, ur.role, p.full_name, p.phone
            FROM user_roles ur
            JOIN profiles p ON p.user_id = ur.user_id
            WHERE ur.organization_id = $1
            ORDER BY p.full_name ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }
}
