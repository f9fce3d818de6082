//! Top-level request dispatch.
//!
//! # Responsibilities
//! - Ask the router for a match
//! - Short-circuit redirects without touching handlers or sessions
//! - Build the handler context and run the named action
//! - Flush sessions and attach their cookies
//! - Convert every failure into a response; nothing escapes `handle`
//!
//! # Design Decisions
//! - No-match is a normal 404, not an error path
//! - A missing dispatch target is its own 500, always logged, distinct
//!   from a fault raised inside the action
//! - Error-response verbosity is gated by `exception_details`

use std::sync::Arc;

use super::context::Context;
use super::registry::HandlerRegistry;
use crate::config::AppConfig;
use crate::http::{Reply, RequestHead};
use crate::routing::{Behavior, Router};
use crate::session::{SessionManager, StoreRegistry};

/// Drives one request from matched route to finished reply.
#[derive(Debug)]
pub struct Dispatcher {
    router: Arc<Router>,
    handlers: Arc<HandlerRegistry>,
    stores: Arc<StoreRegistry>,
    exception_details: bool,
    cookie_prefix: String,
}

impl Dispatcher {
    pub fn new(
        router: Arc<Router>,
        handlers: Arc<HandlerRegistry>,
        stores: Arc<StoreRegistry>,
        config: &AppConfig,
    ) -> Self {
        Self {
            router,
            handlers,
            stores,
            exception_details: config.exception_details,
            cookie_prefix: config.session.cookie_prefix.clone(),
        }
    }

    /// The router in use, for introspection alongside dispatch.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Handle one request. Infallible: every outcome is a [`Reply`].
    pub fn handle(&self, request: &RequestHead) -> Reply {
        let method = request.method.clone();
        let path = request.path.clone();

        let Some(matched) = self.router.match_request(request) else {
            tracing::debug!(method = %method, path = %path, "No route matched");
            return Reply::not_found(&path);
        };

        match matched.behavior {
            Behavior::Redirect {
                location,
                permanent,
            } => {
                // Short-circuit: no handler, no session manager.
                tracing::debug!(
                    method = %method,
                    path = %path,
                    location = %location,
                    permanent,
                    "Redirecting"
                );
                Reply::redirect(&location, permanent)
            }
            Behavior::Dispatch { target, action } => {
                // A captured `action` param overrides the route default.
                let action = matched
                    .captures
                    .get("action")
                    .cloned()
                    .unwrap_or(action);
                self.run_action(request, &target, &action, matched.captures)
            }
        }
    }

    fn run_action(
        &self,
        request: &RequestHead,
        target: &str,
        action: &str,
        captures: std::collections::HashMap<String, String>,
    ) -> Reply {
        let callable = match self.handlers.lookup(target, action) {
            Ok(callable) => callable,
            Err(missing) => {
                tracing::error!(
                    method = %request.method,
                    path = %request.path,
                    error = %missing,
                    "Dispatch target missing"
                );
                return Reply::server_error(&missing.to_string(), self.exception_details);
            }
        };

        let sessions = SessionManager::new(self.stores.clone(), &self.cookie_prefix, request);
        let mut context = Context::new(request, captures, sessions);

        let outcome = callable(&mut context);
        let sessions = context.into_sessions();

        let mut reply = match outcome {
            Ok(reply) => reply,
            Err(fault) => {
                tracing::error!(
                    method = %request.method,
                    path = %request.path,
                    target = %target,
                    action = %action,
                    error = %fault,
                    "Action raised"
                );
                Reply::server_error(&fault.to_string(), self.exception_details)
            }
        };

        // Created sessions flush exactly once, error reply or not, so
        // identifier allocation still reaches the client.

        match sessions.finish() {
            Ok(tickets) => {
                for ticket in tickets {
                    reply.add_cookie(&ticket.cookie_name, &ticket.token);
                }
                tracing::debug!(
                    method = %request.method,
                    path = %request.path,
                    status = %reply.status,
                    "Dispatched"
                );
                reply
            }
            Err(err) => {
                tracing::error!(
                    method = %request.method,
                    path = %request.path,
                    error = %err,
                    "Session flush failed"
                );
                Reply::server_error(&err.to_string(), self.exception_details)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::routing::RouteDefinitionError;
    use crate::session::SessionStore;
    use axum::http::StatusCode;
    use serde_json::json;

    fn dispatcher(
        store: &str,
        routes: impl FnOnce(&mut crate::routing::RouteSet) -> Result<(), RouteDefinitionError>,
        handlers: impl FnOnce(&mut HandlerRegistry),
    ) -> Dispatcher {
        let router = Arc::new(Router::new());
        router.prepare(routes).unwrap();

        let mut registry = HandlerRegistry::new();
        handlers(&mut registry);

        let config = AppConfig {
            exception_details: true,
            session: SessionConfig {
                store: store.to_string(),
                ..SessionConfig::default()
            },
            ..AppConfig::default()
        };
        let stores = Arc::new(StoreRegistry::from_config(&config.session));
        Dispatcher::new(router, Arc::new(registry), stores, &config)
    }

    #[test]
    fn no_match_is_a_404_reply() {
        let dispatcher = dispatcher("memory", |_set| Ok(()), |_registry| {});
        let reply = dispatcher.handle(&RequestHead::get("/missing"));
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn redirect_short_circuits_without_sessions() {
        let dispatcher = dispatcher(
            "memory",
            |set| set.route("/old/location").redirect("/new/location", true),
            |_registry| {},
        );
        let reply = dispatcher.handle(&RequestHead::get("/old/location"));
        assert_eq!(reply.status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(reply.location(), Some("/new/location"));
        assert!(reply.cookies().is_empty());
    }

    #[test]
    fn action_writes_param_into_session() {
        let dispatcher = dispatcher(
            "memory",
            |set| set.route("/").to("pages", "store_foo"),
            |registry| {
                registry.register("pages", "store_foo", |ctx| {
                    let foo = ctx.param("foo").unwrap_or_default().to_string();
                    ctx.session()?.insert("foo", json!(foo));
                    Ok(Reply::text("stored"))
                });
            },
        );

        let reply = dispatcher.handle(&RequestHead::get("/?foo=bar"));
        assert_eq!(reply.status, StatusCode::OK);

        // The flushed session is observable through the shared backend.
        let cookies = reply.cookies();
        assert_eq!(cookies.len(), 1);
        let token = cookies[0]
            .strip_prefix("sid_memory=")
            .unwrap()
            .split(';')
            .next()
            .unwrap();
        let store = dispatcher.stores.get("memory").unwrap();
        let loaded = store.load(token).unwrap().unwrap();
        assert_eq!(loaded.data.get("foo"), Some(&json!("bar")));
    }

    #[test]
    fn missing_target_is_a_logged_500() {
        let dispatcher = dispatcher(
            "memory",
            |set| set.route("/ghost").to("nobody", "nothing"),
            |_registry| {},
        );
        let reply = dispatcher.handle(&RequestHead::get("/ghost"));
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(reply.body.contains("nobody#nothing"));
    }

    #[test]
    fn action_fault_is_caught_at_the_boundary() {
        let dispatcher = dispatcher(
            "memory",
            |set| set.route("/boom").to("pages", "boom"),
            |registry| {
                registry.register("pages", "boom", |_ctx| {
                    Err(super::super::registry::ActionError::new("it broke"))
                });
            },
        );
        let reply = dispatcher.handle(&RequestHead::get("/boom"));
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(reply.body.contains("it broke"));
    }

    #[test]
    fn capture_overrides_default_action() {
        let dispatcher = dispatcher(
            "memory",
            |set| set.route("/pages/:action").to("pages", "index"),
            |registry| {
                registry.register("pages", "index", |_ctx| Ok(Reply::text("index")));
                registry.register("pages", "show", |_ctx| Ok(Reply::text("show")));
            },
        );

        let reply = dispatcher.handle(&RequestHead::get("/pages/show"));
        assert_eq!(reply.body, "show");
    }

    #[test]
    fn none_store_faults_on_session_access() {
        let dispatcher = dispatcher(
            "none",
            |set| set.route("/needs-session").to("pages", "touch"),
            |registry| {
                registry.register("pages", "touch", |ctx| {
                    ctx.session()?;
                    Ok(Reply::text("never"))
                });
            },
        );
        let reply = dispatcher.handle(&RequestHead::get("/needs-session"));
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
