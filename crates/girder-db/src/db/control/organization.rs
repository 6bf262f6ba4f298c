use girder_core::{models::Organization, AppError};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for organizations and their one-level sub-organization tree.
#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        let organization = sqlx::query_as::<Postgres, Organization>(
            "SELECT id, name, slug, parent_organization_id, created_at, updated_at FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    /// Direct children only. Hierarchy depth is capped at one level, so this
    /// is the whole descendant set.
    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.operation = "select"))]
    pub async fn list_children(&self, parent_id: Uuid) -> Result<Vec<Organization>, AppError> {
        let children = sqlx::query_as::<Postgres, Organization>(
            "SELECT id, name, slug, parent_organization_id, created_at, updated_at FROM organizations WHERE parent_organization_id = $1 ORDER BY name ASC",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(children)
    }

    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.operation = "select"))]
    pub async fn child_ids(&self, parent_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar::<Postgres, Uuid>(
            "SELECT id FROM organizations WHERE parent_organization_id = $1",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Create a sub-organization under a top-level parent.
    ///
    /// The parent must itself be top-level (null parent): a sub-organization
    /// can never parent grandchildren. A unique slug is generated from the
    /// name plus a random suffix.
    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.operation = "insert"))]
    pub async fn create_sub_organization(
        &self,
        parent_id: Uuid,
        name: &str,
    ) -> Result<Organization, AppError> {
        let parent_is_top_level = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM organizations WHERE id = $1 AND parent_organization_id IS NULL)",
        )
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await?;

        if !parent_is_top_level {
            return Err(AppError::BadRequest(
                "Sub-organizations can only be created under a top-level organization".to_string(),
            ));
        }

        let slug = generate_slug(name);
        let organization = sqlx::query_as::<Postgres, Organization>(
            r#"
            INSERT INTO organizations (name, slug, parent_organization_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, parent_organization_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(&slug)
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(organization)
    }

    /// Delete a sub-organization. Cascades to all of its data and is
    /// irreversible; callers must have verified the caller is the top-level
    /// parent's owner.
    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.operation = "delete", db.record_id = %id))]
    pub async fn delete_sub_organization(
        &self,
        parent_id: Uuid,
        id: Uuid,
    ) -> Result<(), AppError> {
        let deleted = sqlx::query(
            "DELETE FROM organizations WHERE id = $1 AND parent_organization_id = $2",
        )
        .bind(id)
        .bind(parent_id)
        .execute(&self.pool)
        .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::OrganizationNotFound(format!(
                "Sub-organization {} not found under this organization",
                id
            )));
        }

        Ok(())
    }
}

/// Lowercase name with non-alphanumerics collapsed to hyphens, plus a random
/// suffix so renames and duplicates never collide.
fn generate_slug(name: &str) -> String {
    let mut base = String::with_capacity(name.len());
    let mut last_was_hyphen = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            base.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            base.push('-');
            last_was_hyphen = true;
        }
    }
    let base = base.trim_end_matches('-');
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", if base.is_empty() { "org" } else { base }, &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_lowercase_hyphenated_with_suffix() {
        let slug = generate_slug("Shakti Constructions (Pune)");
        assert!(slug.starts_with("shakti-constructions-pune-"));
        assert_eq!(slug.len(), "shakti-constructions-pune-".len() + 8);
    }

    #[test]
    fn empty_name_still_yields_a_slug() {
        let slug = generate_slug("  ");
        assert!(slug.starts_with("org-"));
    }

    #[test]
    fn slugs_are_unique_per_call() {
        assert_ne!(generate_slug("Site A"), generate_slug("Site A"));
    }
}
