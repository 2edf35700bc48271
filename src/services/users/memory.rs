/*
 * Responsibility
 * - process-local UserService used by the binary's default wiring
 * - roles `admin` and `user` are seeded at construction
 * - token issuance is delegated to the injected TokenIssuer
 */
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::password::{DEFAULT_HASH_COST, MAX_PASSWORD_BYTES, PasswordDigest};
use super::{
    ADMIN_ROLE, DEFAULT_ROLE, LoginInput, ProfileUpdate, RegisterInput, Role, ServiceError,
    ServiceResult, User, UserService,
};
use crate::services::tokens::TokenIssuer;

struct UserRecord {
    user: User,
    password: PasswordDigest,
}

#[derive(Default)]
struct Store {
    users: HashMap<String, UserRecord>,
    roles: Vec<Role>,
}

impl Store {
    fn role_named(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.name == name)
    }

    fn record_mut(&mut self, id: &str) -> ServiceResult<&mut UserRecord> {
        self.users.get_mut(id).ok_or(ServiceError::NotFound("user"))
    }

    fn email_taken(&self, email: &str, except: Option<&str>) -> bool {
        self.users.values().any(|r| {
            Some(r.user.id.as_str()) != except && r.user.email.eq_ignore_ascii_case(email)
        })
    }

    fn username_taken(&self, username: &str, except: Option<&str>) -> bool {
        self.users
            .values()
            .any(|r| Some(r.user.id.as_str()) != except && r.user.username == username)
    }
}

pub struct MemoryUserService {
    store: RwLock<Store>,
    tokens: Arc<dyn TokenIssuer>,
    hash_cost: u32,
}

impl std::fmt::Debug for MemoryUserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryUserService").finish_non_exhaustive()
    }
}

impl MemoryUserService {
    pub fn new(tokens: Arc<dyn TokenIssuer>) -> Self {
        let roles = [ADMIN_ROLE, DEFAULT_ROLE]
            .into_iter()
            .map(|name| Role {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
            })
            .collect();

        Self {
            store: RwLock::new(Store {
                users: HashMap::new(),
                roles,
            }),
            tokens,
            hash_cost: DEFAULT_HASH_COST,
        }
    }

    /// bcrypt cost for passwords stored from now on.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Registers a user and gives it the administrator role.
    pub async fn seed_admin(&self, input: RegisterInput) -> ServiceResult<User> {
        let user = self.register(input).await?;
        let admin_role_id = {
            let store = self.store.read().await;
            store
                .role_named(ADMIN_ROLE)
                .map(|r| r.id.clone())
                .ok_or(ServiceError::NotFound("role"))?
        };
        self.assign_role(&user.id, &admin_role_id).await
    }
}

fn validate_email(email: &str) -> ServiceResult<()> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ServiceError::InvalidInput("invalid email".into())),
    }
}

fn validate_username(username: &str) -> ServiceResult<()> {
    if username.trim().is_empty() {
        return Err(ServiceError::InvalidInput("username is required".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> ServiceResult<()> {
    if password.is_empty() {
        return Err(ServiceError::InvalidInput("password is required".into()));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ServiceError::InvalidInput("password is too long".into()));
    }
    Ok(())
}

#[async_trait]
impl UserService for MemoryUserService {
    async fn register(&self, input: RegisterInput) -> ServiceResult<User> {
        validate_email(&input.email)?;
        validate_username(&input.username)?;
        validate_password(&input.password)?;
        let password = PasswordDigest::new(&input.password, self.hash_cost).await?;

        let mut store = self.store.write().await;
        if store.email_taken(&input.email, None) {
            return Err(ServiceError::AlreadyExists("email"));
        }
        if store.username_taken(&input.username, None) {
            return Err(ServiceError::AlreadyExists("username"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: input.email.trim().to_string(),
            username: input.username.trim().to_string(),
            role: store.role_named(DEFAULT_ROLE).cloned(),
            created_at: now,
            updated_at: now,
        };

        store.users.insert(
            user.id.clone(),
            UserRecord {
                user: user.clone(),
                password,
            },
        );

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    async fn login(&self, input: LoginInput) -> ServiceResult<String> {
        let (user_id, email, password) = {
            let store = self.store.read().await;
            let record = store
                .users
                .values()
                .find(|r| r.user.email.eq_ignore_ascii_case(input.email.trim()))
                .ok_or(ServiceError::InvalidCredentials)?;
            (
                record.user.id.clone(),
                record.user.email.clone(),
                record.password.clone(),
            )
        };

        if !password.verify(&input.password).await? {
            return Err(ServiceError::InvalidCredentials);
        }

        self.tokens
            .issue(&user_id, &email)
            .map_err(|e| ServiceError::Backend(e.to_string()))
    }

    async fn get_user_by_id(&self, id: &str) -> ServiceResult<User> {
        let store = self.store.read().await;
        store
            .users
            .get(id)
            .map(|r| r.user.clone())
            .ok_or(ServiceError::NotFound("user"))
    }

    async fn update_user(&self, id: &str, update: ProfileUpdate) -> ServiceResult<User> {
        if let Some(email) = &update.email {
            validate_email(email)?;
        }
        if let Some(username) = &update.username {
            validate_username(username)?;
        }

        let mut store = self.store.write().await;
        if !store.users.contains_key(id) {
            return Err(ServiceError::NotFound("user"));
        }
        if let Some(email) = &update.email
            && store.email_taken(email, Some(id))
        {
            return Err(ServiceError::AlreadyExists("email"));
        }
        if let Some(username) = &update.username
            && store.username_taken(username, Some(id))
        {
            return Err(ServiceError::AlreadyExists("username"));
        }

        let record = store.record_mut(id)?;
        if let Some(email) = update.email {
            record.user.email = email.trim().to_string();
        }
        if let Some(username) = update.username {
            record.user.username = username.trim().to_string();
        }
        record.user.updated_at = Utc::now();

        Ok(record.user.clone())
    }

    async fn list_users(&self) -> ServiceResult<Vec<User>> {
        let store = self.store.read().await;
        let mut users: Vec<User> = store.users.values().map(|r| r.user.clone()).collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn delete_user(&self, id: &str) -> ServiceResult<()> {
        let mut store = self.store.write().await;
        if store.users.remove(id).is_none() {
            return Err(ServiceError::NotFound("user"));
        }

        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }

    async fn list_roles(&self) -> ServiceResult<Vec<Role>> {
        let store = self.store.read().await;
        Ok(store.roles.clone())
    }

    async fn assign_role(&self, user_id: &str, role_id: &str) -> ServiceResult<User> {
        let mut store = self.store.write().await;
        if !store.users.contains_key(user_id) {
            return Err(ServiceError::NotFound("user"));
        }
        let role = store
            .roles
            .iter()
            .find(|r| r.id == role_id)
            .cloned()
            .ok_or(ServiceError::NotFound("role"))?;

        let record = store.record_mut(user_id)?;
        record.user.role = Some(role);
        record.user.updated_at = Utc::now();

        tracing::info!(user_id = %user_id, role_id = %role_id, "role assigned");
        Ok(record.user.clone())
    }

    async fn change_password(
        &self,
        id: &str,
        old_password: &str,
        new_password: &str,
    ) -> ServiceResult<User> {
        validate_password(new_password)?;

        let current = {
            let store = self.store.read().await;
            store
                .users
                .get(id)
                .map(|r| r.password.clone())
                .ok_or(ServiceError::NotFound("user"))?
        };
        if !current.verify(old_password).await? {
            return Err(ServiceError::InvalidCredentials);
        }
        let replacement = PasswordDigest::new(new_password, self.hash_cost).await?;

        let mut store = self.store.write().await;
        let record = store.record_mut(id)?;
        // changed by someone else while we were hashing
        if record.password != current {
            return Err(ServiceError::InvalidCredentials);
        }
        record.password = replacement;
        record.user.updated_at = Utc::now();

        Ok(record.user.clone())
    }

    async fn reset_password(&self, id: &str, new_password: &str) -> ServiceResult<User> {
        validate_password(new_password)?;
        let replacement = PasswordDigest::new(new_password, self.hash_cost).await?;

        let mut store = self.store.write().await;
        let record = store.record_mut(id)?;
        record.password = replacement;
        record.user.updated_at = Utc::now();

        tracing::info!(user_id = %id, "password reset");
        Ok(record.user.clone())
    }
}
