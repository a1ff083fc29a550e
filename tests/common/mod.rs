use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

use tenant_gate::app::build_router;
use tenant_gate::config::TokenKey;
use tenant_gate::repos::memory::{
    InMemoryMembershipStore, InMemoryTenantRegistry, InMemoryUserRepository,
};
use tenant_gate::repos::{Membership, MembershipStatus, TenantRecord, User};
use tenant_gate::services::auth::JwtTokenService;
use tenant_gate::services::tenant::TenantDirectory;
use tenant_gate::state::AppState;

#[path = "../../src/test_support/records.rs"]
mod records;

pub use records::{membership, tenant, user};

pub const SECRET: &str = "integration-secret-with-enough-entropy-42";
pub const ISSUER: &str = "https://auth.test";
pub const AUDIENCE: &str = "learning-api";

pub struct TestApp {
    pub users: InMemoryUserRepository,
    pub tenants: InMemoryTenantRegistry,
    pub memberships: InMemoryMembershipStore,
    pub directory: Arc<TenantDirectory>,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            users: InMemoryUserRepository::new(),
            tenants: InMemoryTenantRegistry::new(),
            memberships: InMemoryMembershipStore::new(),
            directory: Arc::new(TenantDirectory::new(Duration::from_secs(300))),
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state(), Duration::from_secs(5))
    }

    pub fn state(&self) -> AppState {
        let tokens = JwtTokenService::new(&TokenKey::Secret(SECRET.into()), ISSUER, AUDIENCE, 0)
            .expect("token service");
        AppState::new(
            Arc::new(tokens),
            Arc::new(self.users.clone()),
            Arc::new(self.tenants.clone()),
            Arc::new(self.memberships.clone()),
            Arc::clone(&self.directory),
        )
        .with_call_timeout(Duration::from_secs(1))
    }
}


/// Sign an access token for `sub`; `extra` is merged over the standard claims.
pub fn token(sub: &str, extra: Value) -> String {
    let mut claims = json!({
        "sub": sub,
        "iss": ISSUER,
        "aud": AUDIENCE,
        "exp": chrono::Utc::now().timestamp() + 600,
    });
    if let (Some(base), Value::Object(extra)) = (claims.as_object_mut(), extra) {
        base.extend(extra);
    }

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("sign")
}

pub fn get(uri: &str) -> axum::http::request::Builder {
    Request::builder().method("GET").uri(uri)
}

pub fn empty(builder: axum::http::request::Builder) -> Request<Body> {
    builder.body(Body::empty()).expect("request")
}

pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
