//! Administrator gate. Runs after `authenticate`.
//!
//! - no `Identity` in the request → 401 (stage ordering broken, not a privilege problem)
//! - user lookup fails, or the user is not an admin → 403, one payload for both
//! - the admin check is redone on every request; nothing is written back

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::extractors::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// Put the administrator gate in front of a route.
pub fn apply(route: MethodRouter<AppState>, state: AppState) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(state, require_admin))
}

pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(identity) = req.extensions().get::<Identity>().cloned() else {
        tracing::warn!(path = %req.uri().path(), "admin gate reached without identity");
        return Err(AppError::Unauthorized);
    };

    let user = match state.users.get_user_by_id(identity.user_id()).await {
        Ok(user) => user,
        Err(err) => {
            tracing::warn!(
                user_id = %identity.user_id(),
                error = %err,
                "admin gate could not load user"
            );
            return Err(AppError::Forbidden);
        }
    };

    if !state.users.is_admin(&user) {
        tracing::warn!(
            user_id = %identity.user_id(),
            path = %req.uri().path(),
            "non-admin caller on admin route"
        );
        return Err(AppError::Forbidden);
    }

    Ok(next.run(req).await)
}
