//! Request-routing and dispatch core for a web-serving stack.
//!
//! Maps an incoming request head to a registered route, executes the
//! route's behavior (dispatch to a named handler action, or redirect),
//! and attaches per-request sessions backed by interchangeable stores.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod observability;
pub mod routing;
pub mod session;

pub use config::AppConfig;
pub use dispatch::{ActionError, Context, Dispatcher, HandlerRegistry};
pub use http::{HttpServer, Protocol, Reply, RequestHead};
pub use routing::{Behavior, RouteDefinitionError, Router};
pub use session::{Session, SessionError, SessionManager, StoreRegistry};
