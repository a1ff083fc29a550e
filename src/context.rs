/*
 * Responsibility
 * - guard chain を流れる request スコープの context
 * - guard ごとに型付きフィールドを一つ持ち、各 guard は自分のフィールドだけ書く
 * - middleware が extensions に入れ、handler は extractor で読む
 */
use serde::Serialize;

use crate::repos::{MembershipStatus, TenantRecord};
use crate::services::tenant::extractor::TenantSource;

/// Who is calling. Written once by the authentication guard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthenticatedIdentity {
    pub user_id: String,
    pub email: String,
    /// Credential role when present, otherwise the user's stored role.
    pub effective_role: String,
    /// Credential tenant when present, otherwise the user's default tenant.
    pub tenant_id: Option<String>,
    /// Decoded credential payload, for handlers that need more than the above.
    #[serde(skip)]
    pub claims: serde_json::Value,
}

/// Which tenant applies. Written by the tenant guard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantContext {
    pub record: TenantRecord,
    /// The identifier the request used (id or slug).
    pub identifier: String,
    #[serde(skip)]
    pub source: TenantSource,
}

impl TenantContext {
    pub fn tenant_id(&self) -> &str {
        &self.record.id
    }
}

/// The caller's standing in the resolved tenant. Written by the membership guard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipContext {
    /// Tenant-scoped role; never used for hierarchy checks.
    pub role: String,
    pub status: MembershipStatus,
}

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub identity: Option<AuthenticatedIdentity>,
    pub tenant: Option<TenantContext>,
    pub membership: Option<MembershipContext>,
}
