use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Organization (tenant) entity.
///
/// A non-null `parent_organization_id` marks a sub-organization. Nesting is
/// capped at one level: a sub-organization can never parent another
/// organization. Deleting an organization cascades to all of its data.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub parent_organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn is_sub_organization(&self) -> bool {
        self.parent_organization_id.is_some()
    }
}
