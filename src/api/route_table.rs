/*
 * Responsibility
 * - route descriptors: (method, path pattern, access level, handler)
 * - turning the table into an axum Router with each route's stages in front
 *
 * Invariants (checked while the table is built; violations are programming
 * errors and panic at startup)
 * - the admin gate never appears without authentication in front of it
 * - one descriptor per (method, path)
 * - unknown (method, path) answers 404 before any stage runs; HEAD counts
 *   as its own method and is not served by a GET route
 */
use std::fmt;

use axum::{
    Router,
    handler::Handler,
    http::Method,
    routing::{MethodFilter, MethodRouter, on},
};

use crate::error::AppError;
use crate::middleware::auth;
use crate::state::AppState;

/// One pipeline step that can let a request through or end it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authenticate,
    AuthorizeAdmin,
}

impl Stage {
    fn apply(self, route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
        match self {
            Stage::Authenticate => auth::authenticate::apply(route, state.clone()),
            Stage::AuthorizeAdmin => auth::admin::apply(route, state.clone()),
        }
    }
}

/// Who may call a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

impl Access {
    /// Stages in execution order.
    pub fn stages(self) -> &'static [Stage] {
        match self {
            Access::Public => &[],
            Access::Authenticated => &[Stage::Authenticate],
            Access::Admin => &[Stage::Authenticate, Stage::AuthorizeAdmin],
        }
    }
}

pub struct RouteDescriptor {
    method: Method,
    path: &'static str,
    access: Access,
    handler: MethodRouter<AppState>,
}

impl RouteDescriptor {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn access(&self) -> Access {
        self.access
    }
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public<H, T>(self, method: Method, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.route(method, path, Access::Public, handler)
    }

    pub fn authenticated<H, T>(self, method: Method, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.route(method, path, Access::Authenticated, handler)
    }

    pub fn admin<H, T>(self, method: Method, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.route(method, path, Access::Admin, handler)
    }

    /// Register one route.
    ///
    /// # Panics
    /// When `(method, path)` is already registered or `method` cannot be routed by axum.
    pub fn route<H, T>(mut self, method: Method, path: &'static str, access: Access, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        let filter = MethodFilter::try_from(method.clone())
            .unwrap_or_else(|_| panic!("cannot route method {method} for {path}"));

        if self.access_for(&method, path).is_some() {
            panic!("route {method} {path} registered twice");
        }

        self.routes.push(RouteDescriptor {
            method,
            path,
            access,
            handler: on(filter, handler),
        });
        self
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter()
    }

    /// Access level registered for an exact `(method, path pattern)`.
    pub fn access_for(&self, method: &Method, path: &str) -> Option<Access> {
        self.routes
            .iter()
            .find(|d| d.method == *method && d.path == path)
            .map(|d| d.access)
    }

    /// Build the dispatcher. Stages are attached per route, so a public
    /// route never runs authentication and a 404 never runs anything.
    pub fn into_router(self, state: &AppState) -> Router<AppState> {
        let mut by_path: Vec<PathRoutes> = Vec::new();

        for RouteDescriptor {
            method,
            path,
            access,
            handler,
        } in self.routes
        {
            // route_layer wraps from the inside out: the first stage goes on last.
            let guarded = access
                .stages()
                .iter()
                .rev()
                .fold(handler, |route, stage| stage.apply(route, state));
            let is_head = method == Method::HEAD;

            match by_path.iter_mut().find(|p| p.path == path) {
                Some(existing) => {
                    let merged =
                        std::mem::replace(&mut existing.route, MethodRouter::new()).merge(guarded);
                    existing.route = merged;
                    existing.has_head |= is_head;
                }
                None => by_path.push(PathRoutes {
                    path,
                    route: guarded,
                    has_head: is_head,
                }),
            }
        }

        by_path
            .into_iter()
            .fold(Router::new(), |router, entry| {
                let mut route = entry.route;
                // axum answers HEAD with the GET handler, stages included.
                // Only an explicitly registered HEAD may do that.
                if !entry.has_head {
                    route = route.head(route_not_found);
                }
                // Known path, unregistered method: same 404 as an unknown path.
                router.route(entry.path, route.fallback(route_not_found))
            })
            .fallback(route_not_found)
    }
}

struct PathRoutes {
    path: &'static str,
    route: MethodRouter<AppState>,
    has_head: bool,
}

async fn route_not_found() -> AppError {
    AppError::not_found("route")
}
