/*
 * Responsibility
 * - read the `{id}` path segment of /users/{id}/... as a target user id
 * - blank or unreadable ids become 400 `missing user id`
 * - anything else reaches the user service exactly as sent
 */
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct UserIdPath(pub String);

impl<S> FromRequestParts<S> for UserIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("missing user id"))?;

        if id.trim().is_empty() {
            return Err(AppError::bad_request("missing user id"));
        }

        Ok(Self(id))
    }
}
