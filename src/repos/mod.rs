pub mod error;
pub mod membership_repo;
pub mod memory;
pub mod tenant_repo;
pub mod user_repo;

pub use error::RepoError;
pub use membership_repo::{Membership, MembershipStatus, MembershipStore, PgMembershipStore};
pub use tenant_repo::{PgTenantRegistry, TenantRecord, TenantRegistry};
pub use user_repo::{PgUserRepository, User, UserRepository};
