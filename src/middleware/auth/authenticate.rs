//! Bearer token verification → `Identity` in request extensions.
//!
//! - `Authorization: Bearer <token>` is the only accepted transport.
//! - Every failure (absent header, other scheme, empty token, rejected token)
//!   answers with the same 401 so callers cannot tell why a token failed.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::extractors::Identity;
use crate::error::AppError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Put the authentication stage in front of a route.
pub fn apply(route: MethodRouter<AppState>, state: AppState) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(state, authenticate))
}

/// Raw token from a well-formed `Authorization` header.
///
/// The prefix is case-sensitive and followed by exactly one space.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?;

    if token.is_empty() || token.starts_with(char::is_whitespace) {
        return None;
    }

    Some(token)
}

pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(req.headers()).map(str::to_owned) else {
        tracing::warn!(path = %req.uri().path(), "missing or malformed authorization header");
        return Err(AppError::Unauthorized);
    };

    let verified = match state.tokens.validate(&token).await {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(
                path = %req.uri().path(),
                error = %err,
                "access token verification failed"
            );
            return Err(AppError::Unauthorized);
        }
    };

    tracing::debug!(
        user_id = %verified.subject,
        jti = ?verified.jti,
        expires_at = verified.expires_at,
        "caller authenticated"
    );
    let identity = Identity::new(verified.subject);

    // middleware → extractor handoff; written once per request
    let previous = req.extensions_mut().insert(identity);
    debug_assert!(previous.is_none(), "identity written twice");

    Ok(next.run(req).await)
}
