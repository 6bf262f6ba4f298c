use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use girder_core::access::{can, Permission, Role};
use girder_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid, // user_id
    pub exp: i64,  // expiration timestamp
    pub iat: i64,  // issued at timestamp
}

/// Request context resolved by the auth middleware and stored in request
/// extensions: the authenticated user, the organization the request acts on,
/// the user's role there, and every organization id the user may scope
/// queries to.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub home_organization_id: Uuid,
    /// `None` means no role in the active organization: reads of the home
    /// organization may still render, but no guarded action passes.
    pub role: Option<Role>,
    pub accessible_organizations: Vec<Uuid>,
}

impl RequestContext {
    /// Guard for a permission-tagged action. 403 carries the tag so clients
    /// can map it to a disabled control.
    pub fn require(&self, permission: Permission) -> Result<Role, AppError> {
        match self.role {
            Some(role) if can(role, permission) => Ok(role),
            _ => Err(AppError::PermissionDenied(format!(
                "Requires permission {}",
                permission
            ))),
        }
    }

    pub fn is_owner(&self) -> bool {
        self.role == Some(Role::Owner)
    }

    pub fn can_access(&self, organization_id: Uuid) -> bool {
        self.accessible_organizations.contains(&organization_id)
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse::new(
                        "Missing request context",
                        "MISSING_REQUEST_CONTEXT",
                    )),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(role: Option<Role>) -> RequestContext {
        let org = Uuid::new_v4();
        RequestContext {
            user_id: Uuid::new_v4(),
            organization_id: org,
            home_organization_id: org,
            role,
            accessible_organizations: vec![org],
        }
    }

    #[test]
    fn owner_passes_any_guard() {
        let ctx = context(Some(Role::Owner));
        assert!(ctx.require(Permission::ProjectsDelete).is_ok());
        assert!(ctx.require(Permission::RolesManage).is_ok());
    }

    #[test]
    fn site_engineer_denied_project_delete_with_tag_in_message() {
        let ctx = context(Some(Role::SiteEngineer));
        let err = ctx.require(Permission::ProjectsDelete).unwrap_err();
        match err {
            AppError::PermissionDenied(msg) => assert!(msg.contains("projects:delete")),
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[test]
    fn no_role_is_denied_everything() {
        let ctx = context(None);
        for permission in Permission::ALL {
            assert!(ctx.require(permission).is_err());
        }
    }
}
