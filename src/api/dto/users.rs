/*
 * Responsibility
 * - DTOs for profile and user/role management endpoints
 * - responses reuse the service's User / Role (they carry no password material)
 */
use serde::Deserialize;

use crate::services::users::ProfileUpdate;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub username: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(email) = &self.email
            && email.trim().is_empty()
        {
            return Err("email cannot be empty");
        }
        if let Some(username) = &self.username
            && username.trim().is_empty()
        {
            return Err("username cannot be empty");
        }
        Ok(())
    }
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            email: req.email,
            username: req.username,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.old_password.is_empty() || self.new_password.is_empty() {
            return Err("old_password and new_password are required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub role_id: String,
}

impl AssignRoleRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.role_id.trim().is_empty() {
            return Err("role_id is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

impl ResetPasswordRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.new_password.is_empty() {
            return Err("new_password is required");
        }
        Ok(())
    }
}
