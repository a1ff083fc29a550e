use serde::Serialize;

use crate::context::AuthenticatedIdentity;

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub user_id: String,
    pub email: String,
    pub role: String,
    pub tenant_id: Option<String>,
}

impl From<AuthenticatedIdentity> for IdentityResponse {
    fn from(identity: AuthenticatedIdentity) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email,
            role: identity.effective_role,
            tenant_id: identity.tenant_id,
        }
    }
}
