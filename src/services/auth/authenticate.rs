/*
 * Responsibility
 * - Authorization header → bearer token → claims → user → AuthenticatedIdentity
 * - 失敗は型付きで返すだけ。リクエストを止めるかどうかは middleware 側が決める
 * - 生の credential はログに出さない
 */
use axum::http::{HeaderMap, header};

use crate::context::AuthenticatedIdentity;
use crate::error::GuardError;
use crate::repos::User;
use crate::services::auth::token::Claims;
use crate::services::deadline::{CallError, bounded};
use crate::state::AppState;

pub async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedIdentity, GuardError> {
    let token = bearer_token(headers)?;

    let claims = match bounded(
        "token_service.validate",
        state.call_timeout,
        state.tokens.validate(token),
    )
    .await
    {
        Ok(claims) => claims,
        Err(CallError::Failed(err)) if err.is_expired() => {
            tracing::info!("access token expired");
            return Err(GuardError::ExpiredToken);
        }
        Err(err) => {
            tracing::warn!(error = %err, "access token validation failed");
            return Err(GuardError::InvalidToken);
        }
    };

    let user = match bounded(
        "user_repository.get_by_id",
        state.call_timeout,
        state.users.get_by_id(&claims.user_id),
    )
    .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(
                user_id = %claims.user_id,
                "credential subject is unknown or inactive"
            );
            return Err(GuardError::UserNotFound);
        }
        Err(err) => {
            tracing::error!(user_id = %claims.user_id, error = %err, "user lookup failed");
            return Err(GuardError::UserNotFound);
        }
    };

    let identity = resolve_identity(claims, user);

    tracing::info!(
        user_id = %identity.user_id,
        email = %identity.email,
        role = %identity.effective_role,
        tenant_id = identity.tenant_id.as_deref().unwrap_or(""),
        "request authenticated"
    );

    Ok(identity)
}

/// Token part of `Authorization: Bearer <token>`. The scheme is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, GuardError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .ok_or(GuardError::MissingCredential)?
        .to_str()
        .map_err(|_| GuardError::InvalidCredentialFormat)?
        .trim();

    if raw.is_empty() {
        return Err(GuardError::MissingCredential);
    }

    let (scheme, token) = raw
        .split_once(' ')
        .ok_or(GuardError::InvalidCredentialFormat)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.contains(' ') {
        return Err(GuardError::InvalidCredentialFormat);
    }

    Ok(token)
}

/// Combine credential and user record. Claim values win when non-empty.
pub fn resolve_identity(claims: Claims, user: User) -> AuthenticatedIdentity {
    let effective_role = claims
        .role
        .filter(|r| !r.trim().is_empty())
        .unwrap_or(user.role);

    let tenant_id = claims
        .tenant_id
        .filter(|t| !t.trim().is_empty())
        .or(user.default_tenant_id);

    let email = if user.email.is_empty() {
        claims.email.unwrap_or_default()
    } else {
        user.email
    };

    AuthenticatedIdentity {
        user_id: user.id,
        email,
        effective_role,
        tenant_id,
        claims: claims.raw,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::HeaderValue;
    use serde_json::json;

    use super::*;
    use crate::services::auth::TokenError;
    use crate::test_support::{Fixture, claims, user};

    fn auth_headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&auth_headers("Bearer abc.def")), Ok("abc.def"));
        assert_eq!(bearer_token(&auth_headers("bearer abc")), Ok("abc"));
        assert_eq!(
            bearer_token(&HeaderMap::new()),
            Err(GuardError::MissingCredential)
        );
        assert_eq!(
            bearer_token(&auth_headers("Basic dXNlcjpwYXNz")),
            Err(GuardError::InvalidCredentialFormat)
        );
        assert_eq!(
            bearer_token(&auth_headers("Bearer")),
            Err(GuardError::InvalidCredentialFormat)
        );
        assert_eq!(
            bearer_token(&auth_headers("Bearer a b")),
            Err(GuardError::InvalidCredentialFormat)
        );
    }

    #[test]
    fn claim_role_wins_and_user_default_tenant_fills_in() {
        let mut c = claims("u1");
        c.role = Some("admin".into());
        c.tenant_id = Some(String::new());

        let u = user("u1", "instructor", Some("t1"));

        let identity = resolve_identity(c, u);
        assert_eq!(identity.effective_role, "admin");
        assert_eq!(identity.tenant_id.as_deref(), Some("t1"));
    }

    #[test]
    fn user_role_used_without_claim_and_claim_tenant_wins() {
        let mut c = claims("u1");
        c.tenant_id = Some("t9".into());

        let u = user("u1", "student", Some("t1"));

        let identity = resolve_identity(c, u);
        assert_eq!(identity.effective_role, "student");
        assert_eq!(identity.tenant_id.as_deref(), Some("t9"));
    }

    #[tokio::test]
    async fn authenticates_known_user() {
        let fx = Fixture::new();
        let mut c = claims("u1");
        c.raw = json!({"sub": "u1", "plan": "pro"});
        fx.tokens.insert("good", Ok(c));
        fx.users.insert(user("u1", "instructor", None)).await;

        let identity = authenticate(&fx.state(), &auth_headers("Bearer good"))
            .await
            .expect("identity");
        assert_eq!(identity.user_id, "u1");
        assert_eq!(identity.effective_role, "instructor");
        assert_eq!(identity.claims["plan"], "pro");
    }

    #[tokio::test]
    async fn expired_and_invalid_tokens_are_distinct() {
        let fx = Fixture::new();
        fx.tokens.insert("old", Err(TokenError::Expired));

        let state = fx.state();
        assert_eq!(
            authenticate(&state, &auth_headers("Bearer old")).await,
            Err(GuardError::ExpiredToken)
        );
        assert_eq!(
            authenticate(&state, &auth_headers("Bearer unknown")).await,
            Err(GuardError::InvalidToken)
        );
    }

    #[tokio::test]
    async fn unknown_subject_is_user_not_found() {
        let fx = Fixture::new();
        fx.tokens.insert("good", Ok(claims("ghost")));

        assert_eq!(
            authenticate(&fx.state(), &auth_headers("Bearer good")).await,
            Err(GuardError::UserNotFound)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_token_service_is_an_invalid_token() {
        let fx = Fixture::new();
        fx.tokens.insert("good", Ok(claims("u1")));
        fx.tokens.set_delay(Duration::from_secs(30));
        fx.users.insert(user("u1", "student", None)).await;

        let state = fx.state().with_call_timeout(Duration::from_millis(100));
        assert_eq!(
            authenticate(&state, &auth_headers("Bearer good")).await,
            Err(GuardError::InvalidToken)
        );
    }
}
