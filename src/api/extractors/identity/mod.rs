/*!
 * Caller identity extractor
 *
 * Public API:
 * - Identity
 * - CurrentIdentity
 */

mod core;
mod types;

pub use self::core::CurrentIdentity;
pub use self::types::Identity;
