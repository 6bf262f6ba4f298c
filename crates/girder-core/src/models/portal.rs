//! Types exchanged with the serverless function boundary.
//!
//! Neither function is reimplemented here: `client-portal` resolves a shareable
//! read-only token, `create-team-member` provisions or attaches a user to an
//! organization. These are the wire contracts the core consumes.

use crate::access::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Permission-scoped slice of one project, as resolved from a portal token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PortalData {
    pub client_name: String,
    /// Portal-level grants, e.g. "view_tasks", "view_photos", "view_bills".
    pub permissions: Vec<String>,
    pub project: serde_json::Value,
    #[serde(default)]
    pub tasks: Vec<serde_json::Value>,
    #[serde(default)]
    pub photos: Vec<serde_json::Value>,
    #[serde(default)]
    pub bills: Vec<serde_json::Value>,
}

/// Envelope returned by the client-portal function.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalEnvelope {
    pub success: bool,
    pub data: Option<PortalData>,
    pub error: Option<String>,
}

/// Request to the create-team-member function. Owner is deliberately not
/// grantable through this path.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProvisionTeamMemberRequest {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub organization_id: Uuid,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProvisionTeamMemberResponse {
    pub success: bool,
    pub user_id: Option<Uuid>,
    /// Set only when a fresh account was created rather than attached.
    pub default_password: Option<String>,
    pub error: Option<String>,
}
