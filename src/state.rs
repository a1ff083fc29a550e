/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: token service, user/tenant/membership store, tenant directory
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;
use std::time::Duration;

use crate::config::TenantSourceConfig;
use crate::repos::{MembershipStore, TenantRegistry, UserRepository};
use crate::services::auth::TokenService;
use crate::services::tenant::TenantDirectory;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<dyn TokenService>,
    pub users: Arc<dyn UserRepository>,
    pub tenants: Arc<dyn TenantRegistry>,
    pub memberships: Arc<dyn MembershipStore>,
    pub directory: Arc<TenantDirectory>,
    pub tenant_sources: TenantSourceConfig,
    pub call_timeout: Duration,
}

impl AppState {
    pub fn new(
        tokens: Arc<dyn TokenService>,
        users: Arc<dyn UserRepository>,
        tenants: Arc<dyn TenantRegistry>,
        memberships: Arc<dyn MembershipStore>,
        directory: Arc<TenantDirectory>,
    ) -> Self {
        Self {
            tokens,
            users,
            tenants,
            memberships,
            directory,
            tenant_sources: TenantSourceConfig::default(),
            call_timeout: Duration::from_secs(3),
        }
    }

    pub fn with_tenant_sources(mut self, tenant_sources: TenantSourceConfig) -> Self {
        self.tenant_sources = tenant_sources;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tenant_sources", &self.tenant_sources)
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}
