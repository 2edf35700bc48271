//! Factory: build `JwtTokens` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::tokens::JwtTokens;

pub fn build_jwt_tokens(config: &Config) -> Arc<JwtTokens> {
    Arc::new(JwtTokens::new(
        &config.jwt_secret,
        &config.auth_issuer,
        &config.auth_audience,
        config.access_token_ttl_seconds,
        config.access_token_leeway_seconds,
    ))
}
