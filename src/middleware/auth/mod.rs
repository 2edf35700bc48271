pub mod admin;
pub mod authenticate;

pub use admin::require_admin;
pub use authenticate::{authenticate, bearer_token};
