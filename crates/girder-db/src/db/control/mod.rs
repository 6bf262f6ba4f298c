pub mod organization;
pub mod profile;
pub mod user_role;

pub use organization::OrganizationRepository;
pub use profile::ProfileRepository;
pub use user_role::UserRoleRepository;
