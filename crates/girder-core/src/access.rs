//! Role and permission model.
//!
//! The role → permission mapping is declarative data, not scattered conditionals:
//! each role owns a fixed slice of permission tags and `can` is a pure membership
//! test. There is no inheritance, no wildcard, and no per-resource override.
//! Roles are a closed enum; an unrecognized role value in the database fails
//! decoding instead of silently resolving to "no permissions".

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Role a user holds within one organization. At most one role per
/// (user, organization) pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    ProjectManager,
    SiteEngineer,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::ProjectManager => write!(f, "project_manager"),
            Role::SiteEngineer => write!(f, "site_engineer"),
        }
    }
}

/// One allowed action class. Tags are never persisted; permission sets are a
/// pure function of [`Role`], recomputed on every check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum Permission {
    ProjectsCreate,
    ProjectsEdit,
    ProjectsDelete,
    TasksCreate,
    TasksEdit,
    TasksDelete,
    IssuesCreate,
    IssuesEdit,
    IssuesDelete,
    MaterialsManage,
    MaterialsApprove,
    MaterialsRequest,
    VendorsManage,
    WorkersManage,
    AttendanceMark,
    AttendanceManage,
    BillingManage,
    BillingApprove,
    PettyCashCreate,
    PettyCashDelete,
    SchedulingManage,
    DrawingsManage,
    DocumentsManage,
    ChecklistsManage,
    ReportsView,
    ReportsManage,
    RolesManage,
    SettingsManage,
}

impl Permission {
    /// Every permission tag, for exhaustive checks and documentation endpoints.
    pub const ALL: [Permission; 28] = [
        Permission::ProjectsCreate,
        Permission::ProjectsEdit,
        Permission::ProjectsDelete,
        Permission::TasksCreate,
        Permission::TasksEdit,
        Permission::TasksDelete,
        Permission::IssuesCreate,
        Permission::IssuesEdit,
        Permission::IssuesDelete,
        Permission::MaterialsManage,
        Permission::MaterialsApprove,
        Permission::MaterialsRequest,
        Permission::VendorsManage,
        Permission::WorkersManage,
        Permission::AttendanceMark,
        Permission::AttendanceManage,
        Permission::BillingManage,
        Permission::BillingApprove,
        Permission::PettyCashCreate,
        Permission::PettyCashDelete,
        Permission::SchedulingManage,
        Permission::DrawingsManage,
        Permission::DocumentsManage,
        Permission::ChecklistsManage,
        Permission::ReportsView,
        Permission::ReportsManage,
        Permission::RolesManage,
        Permission::SettingsManage,
    ];

    /// The wire/display form of the tag, e.g. `projects:create`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ProjectsCreate => "projects:create",
            Permission::ProjectsEdit => "projects:edit",
            Permission::ProjectsDelete => "projects:delete",
            Permission::TasksCreate => "tasks:create",
            Permission::TasksEdit => "tasks:edit",
            Permission::TasksDelete => "tasks:delete",
            Permission::IssuesCreate => "issues:create",
            Permission::IssuesEdit => "issues:edit",
            Permission::IssuesDelete => "issues:delete",
            Permission::MaterialsManage => "materials:manage",
            Permission::MaterialsApprove => "materials:approve",
            Permission::MaterialsRequest => "materials:request",
            Permission::VendorsManage => "vendors:manage",
            Permission::WorkersManage => "workers:manage",
            Permission::AttendanceMark => "attendance:mark",
            Permission::AttendanceManage => "attendance:manage",
            Permission::BillingManage => "billing:manage",
            Permission::BillingApprove => "billing:approve",
            Permission::PettyCashCreate => "petty_cash:create",
            Permission::PettyCashDelete => "petty_cash:delete",
            Permission::SchedulingManage => "scheduling:manage",
            Permission::DrawingsManage => "drawings:manage",
            Permission::DocumentsManage => "documents:manage",
            Permission::ChecklistsManage => "checklists:manage",
            Permission::ReportsView => "reports:view",
            Permission::ReportsManage => "reports:manage",
            Permission::RolesManage => "roles:manage",
            Permission::SettingsManage => "settings:manage",
        }
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Project managers hold everything an owner does except project deletion,
/// bill approval, and organization administration.
const PROJECT_MANAGER_PERMISSIONS: [Permission; 24] = [
    Permission::ProjectsCreate,
    Permission::ProjectsEdit,
    Permission::TasksCreate,
    Permission::TasksEdit,
    Permission::TasksDelete,
    Permission::IssuesCreate,
    Permission::IssuesEdit,
    Permission::IssuesDelete,
    Permission::MaterialsManage,
    Permission::MaterialsApprove,
    Permission::MaterialsRequest,
    Permission::VendorsManage,
    Permission::WorkersManage,
    Permission::AttendanceMark,
    Permission::AttendanceManage,
    Permission::BillingManage,
    Permission::PettyCashCreate,
    Permission::PettyCashDelete,
    Permission::SchedulingManage,
    Permission::DrawingsManage,
    Permission::DocumentsManage,
    Permission::ChecklistsManage,
    Permission::ReportsView,
    Permission::ReportsManage,
];

/// Site engineers work within projects: tasks, issues, material requests,
/// attendance marking, petty cash entry, and the site document set.
const SITE_ENGINEER_PERMISSIONS: [Permission; 11] = [
    Permission::TasksCreate,
    Permission::TasksEdit,
    Permission::IssuesCreate,
    Permission::IssuesEdit,
    Permission::MaterialsRequest,
    Permission::AttendanceMark,
    Permission::PettyCashCreate,
    Permission::DrawingsManage,
    Permission::DocumentsManage,
    Permission::ChecklistsManage,
    Permission::ReportsView,
];

/// The full permission set for a role.
pub fn role_permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::Owner => &Permission::ALL,
        Role::ProjectManager => &PROJECT_MANAGER_PERMISSIONS,
        Role::SiteEngineer => &SITE_ENGINEER_PERMISSIONS,
    }
}

/// Whether `role` may perform the action class `permission`.
pub fn can(role: Role, permission: Permission) -> bool {
    role_permissions(role).contains(&permission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // The ground-truth matrix: every permission each non-owner role holds.
    // Owners hold all tags. Any tag absent here must resolve to false.
    fn expected(role: Role) -> HashSet<Permission> {
        use Permission::*;
        match role {
            Role::Owner => Permission::ALL.into_iter().collect(),
            Role::ProjectManager => {
                let mut set: HashSet<Permission> = Permission::ALL.into_iter().collect();
                for denied in [ProjectsDelete, BillingApprove, RolesManage, SettingsManage] {
                    set.remove(&denied);
                }
                set
            }
            Role::SiteEngineer => [
                TasksCreate,
                TasksEdit,
                IssuesCreate,
                IssuesEdit,
                MaterialsRequest,
                AttendanceMark,
                PettyCashCreate,
                DrawingsManage,
                DocumentsManage,
                ChecklistsManage,
                ReportsView,
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn permission_matrix_is_exhaustive() {
        for role in [Role::Owner, Role::ProjectManager, Role::SiteEngineer] {
            let allowed = expected(role);
            for permission in Permission::ALL {
                assert_eq!(
                    can(role, permission),
                    allowed.contains(&permission),
                    "role {} / permission {}",
                    role,
                    permission
                );
            }
        }
    }

    #[test]
    fn owner_holds_every_tag() {
        assert_eq!(role_permissions(Role::Owner).len(), Permission::ALL.len());
    }

    #[test]
    fn project_manager_cannot_administer_organization() {
        assert!(!can(Role::ProjectManager, Permission::ProjectsDelete));
        assert!(!can(Role::ProjectManager, Permission::BillingApprove));
        assert!(!can(Role::ProjectManager, Permission::RolesManage));
        assert!(!can(Role::ProjectManager, Permission::SettingsManage));
    }

    #[test]
    fn site_engineer_cannot_delete_or_manage() {
        assert!(!can(Role::SiteEngineer, Permission::TasksDelete));
        assert!(!can(Role::SiteEngineer, Permission::IssuesDelete));
        assert!(!can(Role::SiteEngineer, Permission::MaterialsManage));
        assert!(!can(Role::SiteEngineer, Permission::SchedulingManage));
        assert!(!can(Role::SiteEngineer, Permission::AttendanceManage));
        assert!(can(Role::SiteEngineer, Permission::ChecklistsManage));
    }

    #[test]
    fn permission_tags_are_unique_wire_strings() {
        let tags: HashSet<&'static str> = Permission::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(tags.len(), Permission::ALL.len());
    }
}
