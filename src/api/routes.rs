/*
 * Responsibility
 * - the URL structure and who may call what
 * - management routes (users, roles, other users' passwords) are admin only
 */
use axum::{Router, http::Method};

use crate::api::handlers::{account, admin, health::health, profile};
use crate::api::route_table::RouteTable;
use crate::state::AppState;

pub fn route_table() -> RouteTable {
    RouteTable::new()
        .public(Method::GET, "/health", health)
        .public(Method::POST, "/register", account::register)
        .public(Method::POST, "/login", account::login)
        .authenticated(Method::GET, "/user/profile", profile::get_profile)
        .authenticated(Method::PUT, "/user/profile", profile::update_profile)
        .authenticated(Method::POST, "/user/change-password", profile::change_password)
        .admin(Method::GET, "/users", admin::list_users)
        .admin(Method::DELETE, "/users/{id}", admin::delete_user)
        .admin(Method::GET, "/roles", admin::list_roles)
        .admin(Method::POST, "/users/{id}/assign-role", admin::assign_role)
        .admin(Method::POST, "/users/{id}/reset-password", admin::reset_password)
}

pub fn routes(state: &AppState) -> Router<AppState> {
    route_table().into_router(state)
}
