//! Record builders. Also compiled into the integration tests (`tests/common`), so
//! the record types come from the including module.
use super::{Membership, MembershipStatus, TenantRecord, User};

pub fn user(id: &str, role: &str, default_tenant_id: Option<&str>) -> User {
    User {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        role: role.to_string(),
        default_tenant_id: default_tenant_id.map(str::to_string),
    }
}

pub fn tenant(id: &str, slug: &str) -> TenantRecord {
    TenantRecord {
        id: id.to_string(),
        slug: slug.to_string(),
        name: format!("{slug} academy"),
        database_name: format!("lms_{}", slug.replace('-', "_")),
        status: "active".to_string(),
    }
}

pub fn membership(user_id: &str, tenant_id: &str, role: &str, status: MembershipStatus) -> Membership {
    Membership {
        id: format!("m-{user_id}-{tenant_id}"),
        user_id: user_id.to_string(),
        tenant_id: tenant_id.to_string(),
        role: role.to_string(),
        status,
    }
}
