//! Access-control resolver.
//!
//! Maps an authenticated user to their home organization, their role there,
//! and the set of organization ids their queries may be scoped to. The
//! resolver determines the *candidate* scope; row-level security in Postgres
//! is the enforcement layer underneath it.
//!
//! Data access goes through the [`Directory`] port so resolution is
//! unit-testable without a database (and without any ambient/global auth
//! context).

use async_trait::async_trait;
use girder_core::access::Role;
use girder_core::AppError;
use girder_db::{OrganizationRepository, ProfileRepository, UserRoleRepository};
use uuid::Uuid;

/// Directory lookups the resolver needs.
#[async_trait]
pub trait Directory: Send + Sync {
    /// The user's home organization; `None` when no profile row exists.
    async fn home_organization(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError>;

    /// Direct children of an organization. One level only.
    async fn child_organizations(&self, organization_id: Uuid) -> Result<Vec<Uuid>, AppError>;

    /// The user's role in an organization; `None` means no permissions.
    async fn role(&self, user_id: Uuid, organization_id: Uuid) -> Result<Option<Role>, AppError>;
}

/// Postgres-backed directory.
#[derive(Clone)]
pub struct PgDirectory {
    profiles: ProfileRepository,
    organizations: OrganizationRepository,
    roles: UserRoleRepository,
}

impl PgDirectory {
    pub fn new(
        profiles: ProfileRepository,
        organizations: OrganizationRepository,
        roles: UserRoleRepository,
    ) -> Self {
        Self {
            profiles,
            organizations,
            roles,
        }
    }
}

#[async_trait]
impl Directory for PgDirectory {
    async fn home_organization(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
        self.profiles.home_organization(user_id).await
    }

    async fn child_organizations(&self, organization_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        self.organizations.child_ids(organization_id).await
    }

    async fn role(&self, user_id: Uuid, organization_id: Uuid) -> Result<Option<Role>, AppError> {
        self.roles.role(user_id, organization_id).await
    }
}

/// Resolves organization scope and roles for authenticated users.
///
/// None of these methods error for "no access": absence comes back as `None`
/// or an empty/home-only set, and callers render nothing or disable the
/// action.
#[derive(Clone)]
pub struct AccessResolver<D: Directory> {
    directory: D,
}

impl<D: Directory> AccessResolver<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub async fn resolve_home_organization(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
        self.directory.home_organization(user_id).await
    }

    pub async fn resolve_role(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Role>, AppError> {
        self.directory.role(user_id, organization_id).await
    }

    /// The organization ids the user's queries may be scoped to: the home
    /// organization, plus its direct children when the user owns the home
    /// organization. Non-owners operate on the home organization only.
    /// Hierarchy depth is capped at one level, so children of children are
    /// never discovered.
    pub async fn resolve_accessible_organizations(
        &self,
        user_id: Uuid,
        home_organization_id: Uuid,
    ) -> Result<Vec<Uuid>, AppError> {
        let role = self.directory.role(user_id, home_organization_id).await?;

        let mut accessible = vec![home_organization_id];
        if role == Some(Role::Owner) {
            accessible.extend(
                self.directory
                    .child_organizations(home_organization_id)
                    .await?,
            );
        }

        Ok(accessible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeDirectory {
        homes: HashMap<Uuid, Uuid>,
        children: HashMap<Uuid, Vec<Uuid>>,
        roles: HashMap<(Uuid, Uuid), Role>,
    }

    #[async_trait]
    impl Directory for FakeDirectory {
        async fn home_organization(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
            Ok(self.homes.get(&user_id).copied())
        }

        async fn child_organizations(
            &self,
            organization_id: Uuid,
        ) -> Result<Vec<Uuid>, AppError> {
            Ok(self.children.get(&organization_id).cloned().unwrap_or_default())
        }

        async fn role(
            &self,
            user_id: Uuid,
            organization_id: Uuid,
        ) -> Result<Option<Role>, AppError> {
            Ok(self.roles.get(&(user_id, organization_id)).copied())
        }
    }

    fn fixture() -> (FakeDirectory, Uuid, Uuid, Uuid, Uuid, Uuid) {
        let org_a = Uuid::new_v4();
        let org_b = Uuid::new_v4();
        let org_c = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let engineer = Uuid::new_v4();

        let directory = FakeDirectory {
            homes: HashMap::from([(owner, org_a), (engineer, org_a)]),
            children: HashMap::from([(org_a, vec![org_b, org_c])]),
            roles: HashMap::from([
                ((owner, org_a), Role::Owner),
                ((engineer, org_a), Role::SiteEngineer),
            ]),
        };

        (directory, org_a, org_b, org_c, owner, engineer)
    }

    #[tokio::test]
    async fn owner_sees_home_and_direct_children() {
        let (directory, org_a, org_b, org_c, owner, _) = fixture();
        let resolver = AccessResolver::new(directory);

        let mut accessible = resolver
            .resolve_accessible_organizations(owner, org_a)
            .await
            .unwrap();
        accessible.sort();
        let mut expected = vec![org_a, org_b, org_c];
        expected.sort();
        assert_eq!(accessible, expected);
    }

    #[tokio::test]
    async fn non_owner_sees_home_only() {
        let (directory, org_a, _, _, _, engineer) = fixture();
        let resolver = AccessResolver::new(directory);

        let accessible = resolver
            .resolve_accessible_organizations(engineer, org_a)
            .await
            .unwrap();
        assert_eq!(accessible, vec![org_a]);
    }

    #[tokio::test]
    async fn missing_profile_resolves_to_none_not_error() {
        let (directory, _, _, _, _, _) = fixture();
        let resolver = AccessResolver::new(directory);

        let stranger = Uuid::new_v4();
        assert_eq!(
            resolver.resolve_home_organization(stranger).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn missing_role_resolves_to_none_not_error() {
        let (directory, org_a, _, _, _, _) = fixture();
        let resolver = AccessResolver::new(directory);

        let stranger = Uuid::new_v4();
        assert_eq!(resolver.resolve_role(stranger, org_a).await.unwrap(), None);
    }
}
