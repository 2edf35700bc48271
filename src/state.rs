/*
 * Responsibility
 * - shared context bound to the Router (AppState)
 *   - users: UserService, tokens: TokenValidator
 * - Clone is cheap (Arc inside); nothing here is mutated after startup
 */
use std::sync::Arc;

use crate::services::{tokens::TokenValidator, users::UserService};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserService>,
    pub tokens: Arc<dyn TokenValidator>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserService>, tokens: Arc<dyn TokenValidator>) -> Self {
        Self { users, tokens }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
