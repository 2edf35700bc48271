/*
 * Responsibility
 * - the user-management service contract the gateway consumes
 * - User / Role models and the inputs handlers pass through
 * - ServiceError: what the service tells its callers
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod memory;
pub mod password;

pub use memory::MemoryUserService;

/// Name of the role that passes the administrator gate.
pub const ADMIN_ROLE: &str = "admin";
/// Role given to self-registered users.
pub const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Partial profile update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0} already exists")]
    AlreadyExists(&'static str),
    #[error("{0}")]
    InvalidInput(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("backend error: {0}")]
    Backend(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// User and role management. Implementations must be safe to call from many
/// requests at once.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, input: RegisterInput) -> ServiceResult<User>;

    /// Returns a bearer token for valid credentials.
    async fn login(&self, input: LoginInput) -> ServiceResult<String>;

    async fn get_user_by_id(&self, id: &str) -> ServiceResult<User>;

    async fn update_user(&self, id: &str, update: ProfileUpdate) -> ServiceResult<User>;

    async fn list_users(&self) -> ServiceResult<Vec<User>>;

    async fn delete_user(&self, id: &str) -> ServiceResult<()>;

    async fn list_roles(&self) -> ServiceResult<Vec<Role>>;

    async fn assign_role(&self, user_id: &str, role_id: &str) -> ServiceResult<User>;

    async fn change_password(
        &self,
        id: &str,
        old_password: &str,
        new_password: &str,
    ) -> ServiceResult<User>;

    async fn reset_password(&self, id: &str, new_password: &str) -> ServiceResult<User>;

    fn is_admin(&self, user: &User) -> bool {
        user.role.as_ref().is_some_and(|r| r.name == ADMIN_ROLE)
    }
}
