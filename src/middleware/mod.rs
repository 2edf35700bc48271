/*
 * Responsibility
 * - middleware public interface
 * - auth: per-route pipeline stages; the rest: router-wide layers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
