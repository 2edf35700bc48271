/*
 * Responsibility
 * - the "authenticated caller" type handlers see
 * - written by the authentication stage into request extensions, read-only afterwards
 *
 * Notes
 * - token verification lives in middleware/services; this is only the contract
 * - one value per request; never cached or shared across requests
 */

/// Caller identity resolved from a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}
