pub mod identity;
pub mod json;
pub mod user_id;

pub use identity::{CurrentIdentity, Identity};
pub use json::JsonBody;
pub use user_id::UserIdPath;
