//! Route configuration and setup.

use crate::api_doc::ApiDoc;
use crate::auth::{auth_middleware, AuthState};
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, patch, post},
    Json, Router,
};
use girder_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config);

    let auth_state = Arc::new(AuthState {
        jwt_secret: config.jwt_secret.clone(),
        app_state: state.clone(),
    });

    // Protected routes carry the auth middleware; public routes do not.
    let protected = protected_routes(state.clone()).layer(
        axum::middleware::from_fn_with_state(auth_state, auth_middleware),
    );

    // Server-level concurrency cap against resource exhaustion under load.
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);

    let app = public_routes(state.clone())
        .merge(protected)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(config.request_body_limit_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn setup_cors(config: &Config) -> CorsLayer {
    if config.cors_origins.contains(&"*".to_string()) || config.cors_origins.is_empty() {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
    }
}

/// Routes that require no bearer token. The portal route authenticates with
/// its share token instead.
fn public_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route("/api/portal", get(handlers::portal::resolve_portal))
        .with_state(state)
}

fn protected_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .merge(organization_routes(state.clone()))
        .merge(project_routes(state.clone()))
        .merge(site_log_routes(state.clone()))
        .merge(labour_routes(state.clone()))
        .merge(material_routes(state.clone()))
        .merge(insight_routes(state))
}

fn organization_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            "/api/organizations",
            get(handlers::organizations::get_organization_tree),
        )
        .route(
            "/api/organizations/sub",
            post(handlers::organizations::create_sub_organization),
        )
        .route(
            "/api/organizations/sub/{id}",
            delete(handlers::organizations::delete_sub_organization),
        )
        .route(
            "/api/team-members",
            get(handlers::team_members::list_team_members)
                .post(handlers::team_members::add_team_member),
        )
        .route(
            "/api/team-members/{user_id}",
            delete(handlers::team_members::remove_team_member),
        )
        .with_state(state)
}

fn project_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            "/api/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(handlers::projects::get_project)
                .patch(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/api/tasks/{id}",
            patch(handlers::tasks::update_task).delete(handlers::tasks::delete_task),
        )
        .route(
            "/api/issues",
            get(handlers::issues::list_issues).post(handlers::issues::create_issue),
        )
        .route(
            "/api/issues/{id}/status",
            patch(handlers::issues::update_issue_status),
        )
        .route("/api/issues/{id}", delete(handlers::issues::delete_issue))
        .with_state(state)
}

fn site_log_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            "/api/safety-incidents",
            get(handlers::site_log::list_incidents).post(handlers::site_log::report_incident),
        )
        .route(
            "/api/safety-incidents/{id}/status",
            patch(handlers::site_log::update_incident_status),
        )
        .route(
            "/api/inspections",
            get(handlers::site_log::list_inspections).post(handlers::site_log::create_inspection),
        )
        .route(
            "/api/inspections/{id}/status",
            patch(handlers::site_log::update_inspection_status),
        )
        .with_state(state)
}

fn labour_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            "/api/workers",
            get(handlers::workers::list_workers).post(handlers::workers::create_worker),
        )
        .route(
            "/api/workers/import/template",
            get(handlers::workers::download_import_template),
        )
        .route("/api/workers/import", post(handlers::workers::import_workers))
        .route(
            "/api/workers/{id}/active",
            patch(handlers::workers::set_worker_active),
        )
        .route(
            "/api/attendance",
            get(handlers::attendance::list_attendance).post(handlers::attendance::mark_attendance),
        )
        .route(
            "/api/payroll/{worker_id}",
            get(handlers::attendance::worker_payroll),
        )
        .with_state(state)
}

fn material_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            "/api/vendors",
            get(handlers::materials::list_vendors).post(handlers::materials::create_vendor),
        )
        .route(
            "/api/purchase-orders",
            get(handlers::materials::list_purchase_orders)
                .post(handlers::materials::create_purchase_order),
        )
        .route(
            "/api/purchase-orders/{id}",
            get(handlers::materials::get_purchase_order),
        )
        .route(
            "/api/goods-receipts",
            post(handlers::materials::create_goods_receipt),
        )
        .route("/api/transfers", post(handlers::materials::create_transfer))
        .route(
            "/api/transfers/{id}/approve",
            post(handlers::materials::approve_transfer),
        )
        .with_state(state)
}

fn insight_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            "/api/compliance",
            get(handlers::insights::get_compliance_report),
        )
        .route("/api/progress", get(handlers::insights::get_daily_progress))
        .route(
            "/api/reports/purchase-orders/{id}",
            get(handlers::reports::purchase_order_report_doc),
        )
        .route(
            "/api/reports/goods-receipts/{id}",
            get(handlers::reports::goods_receipt_report_doc),
        )
        .route(
            "/api/reports/daily-progress",
            get(handlers::reports::daily_progress_report_doc),
        )
        .route(
            "/api/reports/payroll",
            get(handlers::reports::payroll_report_doc),
        )
        .with_state(state)
}
