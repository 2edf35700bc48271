//! Route policy and unmatched-route behaviour.
mod common;

use std::sync::atomic::Ordering;

use axum::http::{Method, StatusCode};
use serde_json::json;
use users_gateway::api::{route_table, route_table::Access};
use users_gateway::services::users::UserService;

use common::{TestApp, empty, json};

#[test]
fn policy_table_matches_the_published_surface() {
    let table = route_table();
    let expected = [
        (Method::GET, "/health", Access::Public),
        (Method::POST, "/register", Access::Public),
        (Method::POST, "/login", Access::Public),
        (Method::GET, "/user/profile", Access::Authenticated),
        (Method::PUT, "/user/profile", Access::Authenticated),
        (Method::POST, "/user/change-password", Access::Authenticated),
        (Method::GET, "/users", Access::Admin),
        (Method::DELETE, "/users/{id}", Access::Admin),
        (Method::GET, "/roles", Access::Admin),
        (Method::POST, "/users/{id}/assign-role", Access::Admin),
        (Method::POST, "/users/{id}/reset-password", Access::Admin),
    ];

    for (method, path, access) in &expected {
        assert_eq!(
            table.access_for(method, path),
            Some(*access),
            "{method} {path}"
        );
    }
    assert_eq!(table.descriptors().count(), expected.len());
}

#[test]
fn every_management_route_is_admin_only() {
    let table = route_table();
    for d in table.descriptors() {
        if d.path().starts_with("/users") || d.path() == "/roles" {
            assert_eq!(d.access(), Access::Admin, "{} {}", d.method(), d.path());
        }
    }
}

#[tokio::test]
async fn unknown_path_is_404_without_running_any_stage() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    let (status, body) = app.send(empty("GET", "/nowhere", Some(&token))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "route not found" }));
    assert_eq!(app.tokens.validate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(app.users.calls("get_user_by_id"), 0);
}

#[tokio::test]
async fn known_path_with_unregistered_method_is_404_too() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let user_path = format!("/users/{}", app.member.id);

    for req in [
        empty("PATCH", "/users", Some(&token)),
        empty("GET", &user_path, Some(&token)),
        empty("DELETE", "/user/profile", Some(&token)),
        empty("GET", "/login", None),
    ] {
        let (status, body) = app.send(req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "route not found" }));
    }

    // HEAD responses carry no body; the status alone must match
    for uri in ["/users", "/roles", "/user/profile", "/health"] {
        let (status, _) = app.send(empty("HEAD", uri, Some(&token))).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "HEAD {uri}");
    }

    assert_eq!(app.tokens.validate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(app.users.calls("get_user_by_id"), 0);
    assert_eq!(app.users.calls("list_users"), 0);
}

#[tokio::test]
async fn head_without_token_on_an_admin_path_is_404_not_401() {
    let app = TestApp::new().await;

    let (status, _) = app.send(empty("HEAD", "/users", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.tokens.validate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn public_register_runs_without_authorization_header() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(json(
            "POST",
            "/register",
            None,
            json!({ "email": "new@example.com", "username": "newbie", "password": "pw" }),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["role"]["name"], "user");
    assert!(body.get("password").is_none());
    assert_eq!(app.users.calls("register"), 1);
    assert_eq!(app.tokens.validate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn profile_without_token_is_401_and_handler_is_skipped() {
    let app = TestApp::new().await;

    let (status, _) = app.send(empty("GET", "/user/profile", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.users.calls("get_user_by_id"), 0);
}

#[tokio::test]
async fn users_with_member_token_is_403() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(empty("GET", "/users", Some(&app.member_token())))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_delete_is_204_and_deletes_once() {
    let app = TestApp::new().await;
    let uri = format!("/users/{}", app.member.id);

    let (status, body) = app
        .send(empty("DELETE", &uri, Some(&app.admin_token())))
        .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);
    assert_eq!(app.users.calls("delete_user"), 1);

    let (status, body) = app
        .send(empty("DELETE", &uri, Some(&app.admin_token())))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "user not found" }));
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new().await;

    let (status, body) = app.send(empty("GET", "/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn padded_user_id_is_passed_through_and_not_found() {
    let app = TestApp::new().await;
    let uri = format!("/users/%20{}%20", app.member.id);

    let (status, body) = app
        .send(empty("DELETE", &uri, Some(&app.admin_token())))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "user not found" }));
    assert!(app.users.inner.get_user_by_id(&app.member.id).await.is_ok());
}

#[tokio::test]
async fn blank_user_id_is_400() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(empty("DELETE", "/users/%20", Some(&app.admin_token())))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "missing user id" }));
    assert_eq!(app.users.calls("delete_user"), 0);
}
