#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::util::ServiceExt;
use users_gateway::{
    AppState, build_router,
    config::Config,
    services::{
        tokens::{TokenError, TokenIssuer, TokenValidator, VerifiedToken},
        users::{
            LoginInput, MemoryUserService, ProfileUpdate, RegisterInput, Role, ServiceResult, User,
            UserService, password::MIN_HASH_COST,
        },
    },
};

pub const TEST_SECRET: &str = "integration-test-secret-0123456789";

/// Tokens are `token-<user id>`; `slow` never finishes on its own.
#[derive(Default)]
pub struct FakeTokens {
    pub validate_calls: AtomicUsize,
    pub slow_dropped: Arc<AtomicBool>,
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TokenValidator for FakeTokens {
    async fn validate(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);

        if token == "slow" {
            let _flag = DropFlag(self.slow_dropped.clone());
            tokio::time::sleep(Duration::from_secs(30)).await;
        }

        match token.strip_prefix("token-") {
            Some(subject) if !subject.is_empty() => Ok(VerifiedToken {
                subject: subject.to_string(),
                jti: None,
                expires_at: i64::MAX,
            }),
            _ => Err(TokenError::EmptyClaim("sub")),
        }
    }
}

pub struct FakeIssuer;

impl TokenIssuer for FakeIssuer {
    fn issue(&self, user_id: &str, _email: &str) -> Result<String, TokenError> {
        Ok(token_for(user_id))
    }
}

pub fn token_for(user_id: &str) -> String {
    format!("token-{user_id}")
}

/// Wraps the in-memory service and counts the calls the tests care about.
pub struct CountingUsers {
    pub inner: MemoryUserService,
    calls: std::sync::Mutex<HashMap<&'static str, usize>>,
}

impl CountingUsers {
    fn new() -> Self {
        Self {
            inner: MemoryUserService::new(Arc::new(FakeIssuer)).with_hash_cost(MIN_HASH_COST),
            calls: Default::default(),
        }
    }

    fn hit(&self, op: &'static str) {
        *self.calls.lock().unwrap().entry(op).or_default() += 1;
    }

    pub fn calls(&self, op: &'static str) -> usize {
        self.calls.lock().unwrap().get(op).copied().unwrap_or(0)
    }
}

#[async_trait]
impl UserService for CountingUsers {
    async fn register(&self, input: RegisterInput) -> ServiceResult<User> {
        self.hit("register");
        self.inner.register(input).await
    }

    async fn login(&self, input: LoginInput) -> ServiceResult<String> {
        self.hit("login");
        self.inner.login(input).await
    }

    async fn get_user_by_id(&self, id: &str) -> ServiceResult<User> {
        self.hit("get_user_by_id");
        self.inner.get_user_by_id(id).await
    }

    async fn update_user(&self, id: &str, update: ProfileUpdate) -> ServiceResult<User> {
        self.hit("update_user");
        self.inner.update_user(id, update).await
    }

    async fn list_users(&self) -> ServiceResult<Vec<User>> {
        self.hit("list_users");
        self.inner.list_users().await
    }

    async fn delete_user(&self, id: &str) -> ServiceResult<()> {
        self.hit("delete_user");
        self.inner.delete_user(id).await
    }

    async fn list_roles(&self) -> ServiceResult<Vec<Role>> {
        self.hit("list_roles");
        self.inner.list_roles().await
    }

    async fn assign_role(&self, user_id: &str, role_id: &str) -> ServiceResult<User> {
        self.hit("assign_role");
        self.inner.assign_role(user_id, role_id).await
    }

    async fn change_password(
        &self,
        id: &str,
        old_password: &str,
        new_password: &str,
    ) -> ServiceResult<User> {
        self.hit("change_password");
        self.inner
            .change_password(id, old_password, new_password)
            .await
    }

    async fn reset_password(&self, id: &str, new_password: &str) -> ServiceResult<User> {
        self.hit("reset_password");
        self.inner.reset_password(id, new_password).await
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<CountingUsers>,
    pub tokens: Arc<FakeTokens>,
    pub admin: User,
    pub member: User,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_env(&[]).await
    }

    pub async fn with_env(extra: &[(&str, &str)]) -> Self {
        let mut vars: HashMap<String, String> =
            HashMap::from([("AUTH_JWT_SECRET".to_string(), TEST_SECRET.to_string())]);
        for (k, v) in extra {
            vars.insert(k.to_string(), v.to_string());
        }
        let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

        let users = Arc::new(CountingUsers::new());
        let tokens = Arc::new(FakeTokens::default());

        let admin = users
            .inner
            .seed_admin(register_input("admin@example.com", "admin", "admin-pass"))
            .await
            .unwrap();
        let member = users
            .inner
            .register(register_input("member@example.com", "member", "member-pass"))
            .await
            .unwrap();

        let state = AppState::new(users.clone(), tokens.clone());
        let router = build_router(state.clone(), &config);

        Self {
            router,
            state,
            users,
            tokens,
            admin,
            member,
        }
    }

    pub fn admin_token(&self) -> String {
        token_for(&self.admin.id)
    }

    pub fn member_token(&self) -> String {
        token_for(&self.member.id)
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        send(&self.router, req).await
    }
}

pub fn register_input(email: &str, username: &str, password: &str) -> RegisterInput {
    RegisterInput {
        email: email.into(),
        username: username.into(),
        password: password.into(),
    }
}

pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn request(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder().method(method).uri(uri)
}

pub fn empty(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = request(method, uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = request(method, uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
