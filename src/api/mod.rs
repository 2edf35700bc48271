/*
 * Responsibility
 * - HTTP surface: route table, handlers, DTOs, extractors
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod route_table;
mod routes;

pub use routes::{route_table, routes};
