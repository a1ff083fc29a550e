/// Factory: build the token service from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{JwtTokenService, TokenService};

pub fn build_token_service(config: &Config) -> anyhow::Result<Arc<dyn TokenService>> {
    let service = JwtTokenService::new(
        &config.token_key,
        &config.auth_issuer,
        &config.auth_audience,
        config.access_token_leeway_seconds,
    )
    .map_err(anyhow::Error::msg)?;

    Ok(Arc::new(service))
}
