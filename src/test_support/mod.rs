//! Fixtures shared by the unit tests. The record builders in `records` are shared
//! with the integration tests as well.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::repos::memory::{InMemoryMembershipStore, InMemoryTenantRegistry, InMemoryUserRepository};
use crate::repos::{Membership, MembershipStatus, TenantRecord, User};
use crate::services::auth::{Claims, TokenError, TokenService};
use crate::services::tenant::TenantDirectory;
use crate::state::AppState;

mod records;

pub use records::{membership, tenant, user};

/// Token service answering from a fixed table; unknown tokens are invalid.
#[derive(Clone, Default)]
pub struct StaticTokenService {
    answers: Arc<Mutex<HashMap<String, Result<Claims, TokenError>>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl StaticTokenService {
    pub fn insert(&self, token: &str, answer: Result<Claims, TokenError>) {
        self.answers
            .lock()
            .expect("lock")
            .insert(token.to_string(), answer);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().expect("lock") = Some(delay);
    }
}

#[async_trait]
impl TokenService for StaticTokenService {
    async fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let delay = *self.delay.lock().expect("lock");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.answers
            .lock()
            .expect("lock")
            .get(token)
            .cloned()
            .unwrap_or_else(|| Err(TokenError::Invalid("unknown token".into())))
    }
}

pub struct Fixture {
    pub tokens: StaticTokenService,
    pub users: InMemoryUserRepository,
    pub tenants: InMemoryTenantRegistry,
    pub memberships: InMemoryMembershipStore,
    pub directory: Arc<TenantDirectory>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            tokens: StaticTokenService::default(),
            users: InMemoryUserRepository::new(),
            tenants: InMemoryTenantRegistry::new(),
            memberships: InMemoryMembershipStore::new(),
            directory: Arc::new(TenantDirectory::new(Duration::from_secs(60))),
        }
    }

    pub fn state(&self) -> AppState {
        AppState::new(
            Arc::new(self.tokens.clone()),
            Arc::new(self.users.clone()),
            Arc::new(self.tenants.clone()),
            Arc::new(self.memberships.clone()),
            Arc::clone(&self.directory),
        )
    }
}

pub fn claims(user_id: &str) -> Claims {
    Claims {
        user_id: user_id.to_string(),
        email: None,
        role: None,
        tenant_id: None,
        raw: json!({ "sub": user_id }),
    }
}
