//! bcrypt password hashes for the in-memory user service.
//!
//! Hashing and verification are CPU bound and run on the blocking pool.
use std::fmt;

use tokio::task;

use super::{ServiceError, ServiceResult};

pub const DEFAULT_HASH_COST: u32 = bcrypt::DEFAULT_COST;
pub const MIN_HASH_COST: u32 = 4;

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

impl PasswordDigest {
    pub async fn new(password: &str, cost: u32) -> ServiceResult<Self> {
        let password = password.to_owned();
        let hash = task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| ServiceError::Backend(format!("password hashing task: {e}")))?
            .map_err(|e| ServiceError::Backend(format!("password hashing: {e}")))?;
        Ok(Self(hash))
    }

    pub async fn verify(&self, password: &str) -> ServiceResult<bool> {
        let password = password.to_owned();
        let hash = self.0.clone();
        task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| ServiceError::Backend(format!("password verification task: {e}")))?
            .map_err(|e| ServiceError::Backend(format!("password verification: {e}")))
    }
}
