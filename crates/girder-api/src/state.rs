//! Application state and sub-state grouping.
//!
//! AppState is split into a database sub-state plus service collaborators so
//! setup can build each piece independently and handlers can reach what they
//! need without a god object.

use girder_core::Config;
use girder_db::{
    AttendanceRepository, InspectionRepository, IssueRepository, MaterialRepository,
    OrganizationRepository, ProfileRepository, ProjectRepository, SafetyRepository,
    TaskRepository, UserRoleRepository, WorkerRepository,
};
use girder_services::{AccessResolver, ChangeFeed, PgDirectory};
use sqlx::PgPool;
use std::sync::Arc;

use crate::external::{PortalClient, TeamProvisioner};

/// Database pool and all repositories.
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub organizations: OrganizationRepository,
    pub profiles: ProfileRepository,
    pub user_roles: UserRoleRepository,
    pub projects: ProjectRepository,
    pub tasks: TaskRepository,
    pub issues: IssueRepository,
    pub safety: SafetyRepository,
    pub inspections: InspectionRepository,
    pub workers: WorkerRepository,
    pub attendance: AttendanceRepository,
    pub materials: MaterialRepository,
}

impl DbState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            organizations: OrganizationRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            user_roles: UserRoleRepository::new(pool.clone()),
            projects: ProjectRepository::new(pool.clone()),
            tasks: TaskRepository::new(pool.clone()),
            issues: IssueRepository::new(pool.clone()),
            safety: SafetyRepository::new(pool.clone()),
            inspections: InspectionRepository::new(pool.clone()),
            workers: WorkerRepository::new(pool.clone()),
            attendance: AttendanceRepository::new(pool.clone()),
            materials: MaterialRepository::new(pool.clone()),
            pool,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DbState,
    pub resolver: AccessResolver<PgDirectory>,
    pub change_feed: Arc<ChangeFeed>,
    pub portal: Arc<dyn PortalClient>,
    pub team: Arc<dyn TeamProvisioner>,
}
