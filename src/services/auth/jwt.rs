use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::config::TokenKey;
use crate::services::auth::token::{Claims, TokenError, TokenService};

/// Access token claims this service reads. Everything else stays in `Claims::raw`.
///
/// NOTE:
/// - `role` / `tenant_id` are optional overrides; an empty string counts as absent.
#[derive(Debug, Clone, Deserialize)]
struct AccessTokenClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    tenant_id: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Access-token verifier (EdDSA public key or HS256 shared secret).
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtTokenService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtTokenService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtTokenService {
    pub fn new(
        key: &TokenKey,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, String> {
        let (decoding_key, algorithm) = match key {
            TokenKey::EdPublicPem(pem) => (
                DecodingKey::from_ed_pem(pem.as_bytes())
                    .map_err(|e| format!("invalid ed25519 public key pem: {}", e))?,
                Algorithm::EdDSA,
            ),
            TokenKey::Secret(secret) => (
                DecodingKey::from_secret(secret.as_bytes()),
                Algorithm::HS256,
            ),
        };

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Signature, `exp`, `iss` and `aud` are checked by `jsonwebtoken`; this adds the
    /// non-empty `sub` requirement and the mapping into [`Claims`].
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data =
            jsonwebtoken::decode::<serde_json::Value>(token, &self.decoding_key, &self.validation)
                .map_err(|e| match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid(e.to_string()),
                })?;

        let raw = data.claims;
        let claims: AccessTokenClaims = serde_json::from_value(raw.clone())
            .map_err(|e| TokenError::Invalid(format!("malformed claims: {}", e)))?;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::Invalid("empty 'sub' claim".into()));
        }

        Ok(Claims {
            user_id: claims.sub,
            email: non_empty(claims.email),
            role: non_empty(claims.role),
            tenant_id: non_empty(claims.tenant_id),
            raw,
        })
    }
}

#[async_trait]
impl TokenService for JwtTokenService {
    async fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use super::*;

    const SECRET: &str = "test-secret-with-enough-entropy-0123456789";

    fn service() -> JwtTokenService {
        JwtTokenService::new(
            &TokenKey::Secret(SECRET.into()),
            "https://auth.test",
            "learning-api",
            0,
        )
        .expect("service")
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn sign(claims: serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("sign")
    }

    #[test]
    fn valid_token_maps_claims() {
        let token = sign(json!({
            "sub": "u1",
            "email": "u1@example.com",
            "role": "admin",
            "tenant_id": "",
            "iss": "https://auth.test",
            "aud": "learning-api",
            "exp": now() + 600,
            "course_scope": ["c1"],
        }));

        let claims = service().verify(&token).expect("valid");
        assert_eq!(claims.user_id, "u1");
        assert_eq!(claims.role.as_deref(), Some("admin"));
        // empty tenant claim counts as absent
        assert_eq!(claims.tenant_id, None);
        assert_eq!(claims.raw["course_scope"][0], "c1");
    }

    #[test]
    fn expired_token_is_reported_distinctly() {
        let token = sign(json!({
            "sub": "u1",
            "iss": "https://auth.test",
            "aud": "learning-api",
            "exp": now() - 600,
        }));

        assert_eq!(service().verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn wrong_audience_is_invalid() {
        let token = sign(json!({
            "sub": "u1",
            "iss": "https://auth.test",
            "aud": "someone-else",
            "exp": now() + 600,
        }));

        let err = service().verify(&token).unwrap_err();
        assert!(!err.is_expired());
    }

    #[test]
    fn garbage_is_invalid() {
        let err = service().verify("not-a-jwt").unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn empty_subject_is_invalid() {
        let token = sign(json!({
            "sub": " ",
            "iss": "https://auth.test",
            "aud": "learning-api",
            "exp": now() + 600,
        }));

        assert!(matches!(service().verify(&token), Err(TokenError::Invalid(_))));
    }
}
