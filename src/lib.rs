/*
 * Responsibility
 * - crate module tree (shared by the binary and the integration tests)
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use app::build_router;
pub use state::AppState;
