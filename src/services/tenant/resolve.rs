/*
 * Responsibility
 * - tenant guard の本体: identifier を抽出 → directory を先に見る → miss なら registry
 * - registry が返した成功結果だけを cache する (negative cache はしない)
 * - 同じ key の同時 miss はそれぞれ registry を叩いてよい (最後の set が勝つ)
 */
use crate::context::TenantContext;
use crate::error::GuardError;
use crate::repos::TenantRecord;
use crate::services::deadline::bounded;
use crate::services::tenant::extractor::{TenantRequest, extract};
use crate::services::tenant::validator::canonical_identifier;
use crate::state::AppState;

pub async fn resolve_request_tenant(
    state: &AppState,
    req: TenantRequest<'_>,
) -> Result<TenantContext, GuardError> {
    let Some(extracted) = extract(req, &state.tenant_sources) else {
        return Err(GuardError::MissingTenant);
    };

    let record = resolve_tenant(state, &extracted.identifier).await?;

    tracing::debug!(
        tenant_id = %record.id,
        identifier = %extracted.identifier,
        source = %extracted.source,
        "tenant resolved"
    );

    Ok(TenantContext {
        record,
        identifier: extracted.identifier,
        source: extracted.source,
    })
}

pub async fn resolve_tenant(state: &AppState, identifier: &str) -> Result<TenantRecord, GuardError> {
    let key = canonical_identifier(identifier);
    let identifier = key.as_str();

    if let Some(record) = state.directory.get(identifier).await {
        return Ok(record);
    }

    let found = bounded(
        "tenant_registry.lookup",
        state.call_timeout,
        state.tenants.lookup(identifier),
    )
    .await;

    match found {
        Ok(Some(record)) if record.is_active() => {
            state.directory.set(identifier, record.clone()).await;
            Ok(record)
        }
        Ok(_) => {
            tracing::info!(identifier, "tenant not found or inactive");
            Err(GuardError::TenantNotFound)
        }
        Err(err) => {
            tracing::error!(identifier, error = %err, "tenant registry lookup failed");
            Err(GuardError::TenantNotFound)
        }
    }
}
