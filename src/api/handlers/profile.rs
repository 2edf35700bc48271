/*
 * Responsibility
 * - /user/... handlers for the authenticated caller
 * - the caller is always the CurrentIdentity; the user record is re-fetched
 *   from the service rather than carried over from a stage
 */
use axum::{Json, extract::State};

use crate::{
    api::{
        dto::users::{ChangePasswordRequest, UpdateProfileRequest},
        extractors::{CurrentIdentity, JsonBody},
    },
    error::AppError,
    services::users::{ServiceError, User},
    state::AppState,
};

pub async fn get_profile(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<User>, AppError> {
    let user = state.users.get_user_by_id(identity.user_id()).await?;
    Ok(Json(user))
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    req.validate().map_err(AppError::rejected_input)?;

    let user = state
        .users
        .update_user(identity.user_id(), req.into())
        .await?;

    Ok(Json(user))
}

pub async fn change_password(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> Result<Json<User>, AppError> {
    req.validate().map_err(AppError::rejected_input)?;

    let user = state
        .users
        .change_password(identity.user_id(), &req.old_password, &req.new_password)
        .await
        .map_err(|e| match e {
            // The caller is authenticated; a wrong old password is bad input, not a 401.
            ServiceError::InvalidCredentials => AppError::bad_request("old password is incorrect"),
            other => other.into(),
        })?;

    Ok(Json(user))
}
