use crate::access::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User profile, pinned to exactly one "home" organization.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Profile {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role assignment: at most one role per (user, organization) pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserRole {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Team member as returned by membership listings: role row joined with the
/// member's profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TeamMember {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: Role,
    pub full_name: String,
    pub phone: Option<String>,
}
