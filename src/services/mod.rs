/*
 * Responsibility
 * - collaborators the gateway depends on (token verification, user management)
 * - traits are the seam; the concrete types here are the default wiring
 */
pub mod tokens;
pub mod users;
