//! In-memory collaborators for local development and tests.
//!
//! Each store keeps its rows in a `HashMap` behind a `tokio::sync::RwLock`. Nothing is
//! durable. The tenant registry additionally counts lookups and can be switched into a
//! failing mode, which is how the "no negative caching" behaviour is exercised.
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repos::error::RepoError;
use crate::repos::membership_repo::{Membership, MembershipStore};
use crate::repos::tenant_repo::{TenantRecord, TenantRegistry};
use crate::repos::user_repo::{User, UserRepository};

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_id(&self, id: &str) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(id).cloned())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryTenantRegistry {
    tenants: Arc<RwLock<Vec<TenantRecord>>>,
    lookups: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryTenantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, tenant: TenantRecord) {
        let mut tenants = self.tenants.write().await;
        tenants.retain(|t| t.id != tenant.id);
        tenants.push(tenant);
    }

    /// Number of `lookup` calls served so far, failed ones included.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl TenantRegistry for InMemoryTenantRegistry {
    async fn lookup(&self, identifier: &str) -> Result<Option<TenantRecord>, RepoError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepoError::Unavailable("tenant registry offline".into()));
        }

        let tenants = self.tenants.read().await;
        Ok(tenants
            .iter()
            .find(|t| t.is_active() && (t.id == identifier || t.slug == identifier))
            .cloned())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryMembershipStore {
    memberships: Arc<RwLock<HashMap<(String, String), Membership>>>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, membership: Membership) {
        let key = (membership.user_id.clone(), membership.tenant_id.clone());
        self.memberships.write().await.insert(key, membership);
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn find(&self, user_id: &str, tenant_id: &str) -> Result<Option<Membership>, RepoError> {
        let key = (user_id.to_string(), tenant_id.to_string());
        Ok(self.memberships.read().await.get(&key).cloned())
    }
}
