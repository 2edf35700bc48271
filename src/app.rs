/*
 * Responsibility
 * - tracing / panic hook setup
 * - Config → collaborators → AppState → Router
 * - router-wide middleware (request id, timeout, CORS, security headers)
 * - axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::services::tokens::build_jwt_tokens;
use crate::services::users::{MemoryUserService, RegisterInput};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g.
    // RUST_LOG=info,users_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so the panic is noticed.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting users gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Default wiring: JWT tokens + in-memory user service.
async fn build_state(config: &Config) -> Result<AppState> {
    let tokens = build_jwt_tokens(config);
    let users = Arc::new(
        MemoryUserService::new(tokens.clone()).with_hash_cost(config.password_hash_cost),
    );

    if let Some(admin) = &config.bootstrap_admin {
        let user = users
            .seed_admin(RegisterInput {
                email: admin.email.clone(),
                username: admin.username.clone(),
                password: admin.password.clone(),
            })
            .await?;
        tracing::info!(user_id = %user.id, "bootstrap admin created");
    } else {
        tracing::warn!("no bootstrap admin configured; admin routes are unreachable");
    }

    Ok(AppState::new(users, tokens))
}

/// Dispatcher plus router-wide layers. The innermost layer is added first.
pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes(&state).with_state(state);
    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config.request_timeout)
}
