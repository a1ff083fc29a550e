use axum::Json;

use crate::api::v1::dto::envelope::{ApiResponse, ok};
use crate::api::v1::dto::identity::IdentityResponse;
use crate::api::v1::extractors::CurrentIdentity;

/// GET /me: the identity the authentication guard resolved.
pub async fn me(CurrentIdentity(identity): CurrentIdentity) -> Json<ApiResponse<IdentityResponse>> {
    ok(IdentityResponse::from(identity))
}
