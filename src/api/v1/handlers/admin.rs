/*
 * Responsibility
 * - tenant directory の診断と明示的な invalidate (admin 以上)
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::v1::dto::envelope::{ApiResponse, ok};
use crate::api::v1::dto::tenants::{TenantCacheInvalidation, TenantCacheStats};
use crate::api::v1::extractors::CurrentIdentity;
use crate::services::tenant::canonical_identifier;
use crate::state::AppState;

pub async fn tenant_cache_stats(State(state): State<AppState>) -> Json<ApiResponse<TenantCacheStats>> {
    ok(TenantCacheStats {
        entries: state.directory.size().await,
        ttl_seconds: state.directory.ttl().as_secs(),
    })
}

pub async fn invalidate_tenant(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(identifier): Path<String>,
) -> Json<ApiResponse<TenantCacheInvalidation>> {
    let identifier = canonical_identifier(&identifier);
    let removed = state.directory.delete(&identifier).await;

    tracing::info!(
        user_id = %identity.user_id,
        identifier = %identifier,
        removed,
        "tenant directory entry invalidated"
    );

    ok(TenantCacheInvalidation {
        identifier,
        removed,
    })
}
