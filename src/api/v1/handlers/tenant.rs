/*
 * Responsibility
 * - tenant スコープの endpoint。ここに来た時点で guard は全部通過済み
 * - /catalog は optional guard の後ろなので context 欠落を自分で扱う
 */
use axum::Json;

use crate::api::v1::dto::envelope::{ApiResponse, ok};
use crate::api::v1::dto::tenants::{CatalogResponse, TenantResponse, TenantSessionResponse};
use crate::api::v1::extractors::{
    CurrentIdentity, CurrentMembership, CurrentTenant, MaybeIdentity, MaybeMembership,
    MaybeTenant,
};

pub async fn current_tenant(
    CurrentIdentity(identity): CurrentIdentity,
    CurrentTenant(tenant): CurrentTenant,
    CurrentMembership(membership): CurrentMembership,
) -> Json<ApiResponse<TenantSessionResponse>> {
    ok(TenantSessionResponse {
        tenant: TenantResponse::from(&tenant),
        membership,
        effective_role: identity.effective_role,
    })
}

/// Same payload as `current_tenant`; the route adds a role requirement.
pub async fn staff_overview(
    identity: CurrentIdentity,
    tenant: CurrentTenant,
    membership: CurrentMembership,
) -> Json<ApiResponse<TenantSessionResponse>> {
    current_tenant(identity, tenant, membership).await
}

pub async fn catalog(
    MaybeIdentity(identity): MaybeIdentity,
    MaybeTenant(tenant): MaybeTenant,
    MaybeMembership(membership): MaybeMembership,
) -> Json<ApiResponse<CatalogResponse>> {
    ok(CatalogResponse {
        authenticated: identity.is_some(),
        tenant: tenant.as_ref().map(TenantResponse::from),
        membership,
    })
}
