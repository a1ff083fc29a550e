/*
 * Responsibility
 * - tenant / membership / cache の DTO
 * - backing store の識別子 (database_name) はサーバ内に留め、serialize しない
 */
use serde::Serialize;

use crate::context::{MembershipContext, TenantContext};

#[derive(Debug, Serialize)]
pub struct TenantResponse {
    pub id: String,
    pub slug: String,
    pub name: String,
}

impl From<&TenantContext> for TenantResponse {
    fn from(ctx: &TenantContext) -> Self {
        Self {
            id: ctx.record.id.clone(),
            slug: ctx.record.slug.clone(),
            name: ctx.record.name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TenantSessionResponse {
    pub tenant: TenantResponse,
    pub membership: MembershipContext,
    pub effective_role: String,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub authenticated: bool,
    pub tenant: Option<TenantResponse>,
    pub membership: Option<MembershipContext>,
}

#[derive(Debug, Serialize)]
pub struct TenantCacheStats {
    pub entries: usize,
    pub ttl_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct TenantCacheInvalidation {
    pub identifier: String,
    pub removed: bool,
}
