//! Bearer-token authentication and organization scoping.
//!
//! Verifies the HS256 JWT, resolves the user's home organization and role,
//! and stores a [`RequestContext`] in request extensions. The optional
//! `X-Organization-Id` header switches the active organization to one of the
//! caller's accessible sub-organizations; anything outside that set is a 403.

use crate::auth::models::{JwtClaims, RequestContext};
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use girder_core::access::Role;
use girder_core::AppError;
use jsonwebtoken::{decode, DecodingKey, Validation};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: String,
    pub app_state: Arc<AppState>,
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    };

    let claims = match decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(auth_state.jwt_secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(data) => data.claims,
        Err(e) => {
            return HttpAppError(AppError::Unauthorized(format!("Invalid token: {}", e)))
                .into_response();
        }
    };

    let requested_org = request
        .headers()
        .get("X-Organization-Id")
        .and_then(|h| h.to_str().ok())
        .map(Uuid::parse_str);
    let requested_org = match requested_org {
        Some(Ok(id)) => Some(id),
        Some(Err(_)) => {
            return HttpAppError(AppError::InvalidInput(
                "X-Organization-Id must be a UUID".to_string(),
            ))
            .into_response();
        }
        None => None,
    };

    // Everything from here on runs with the user pinned to the task, so each
    // connection the pool hands out carries request.user_id for the
    // row-level-security policies. That includes context resolution itself.
    girder_db::with_request_user(claims.sub, async move {
        let context = match resolve_context(&auth_state.app_state, claims.sub, requested_org).await
        {
            Ok(ctx) => ctx,
            Err(e) => return HttpAppError(e).into_response(),
        };

        request.extensions_mut().insert(context);
        next.run(request).await
    })
    .await
}

async fn resolve_context(
    state: &AppState,
    user_id: Uuid,
    requested_org: Option<Uuid>,
) -> Result<RequestContext, AppError> {
    let home = state
        .resolver
        .resolve_home_organization(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("No profile found for user".to_string()))?;

    let accessible = state
        .resolver
        .resolve_accessible_organizations(user_id, home)
        .await?;

    let active = requested_org.unwrap_or(home);
    if !accessible.contains(&active) {
        return Err(AppError::PermissionDenied(
            "Organization is not accessible to this user".to_string(),
        ));
    }

    let home_role = state.resolver.resolve_role(user_id, home).await?;
    let role = if active == home {
        home_role
    } else {
        // Sub-organization scope: an explicit role there wins; otherwise an
        // owner of the parent carries ownership down the single level.
        match state.resolver.resolve_role(user_id, active).await? {
            Some(role) => Some(role),
            None if home_role == Some(Role::Owner) => Some(Role::Owner),
            None => None,
        }
    };

    Ok(RequestContext {
        user_id,
        organization_id: active,
        home_organization_id: home,
        role,
        accessible_organizations: accessible,
    })
}
