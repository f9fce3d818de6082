//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! RequestHead
//!     → dispatcher.rs (router lookup)
//!     → Redirect behavior: reply immediately, nothing else runs
//!     → Dispatch behavior:
//!         registry.rs (resolve (handler, action) to a callable)
//!         context.rs (merged params + lazy sessions)
//!         action runs → Reply
//!         session flush → Set-Cookie per created session
//! ```
//!
//! # Design Decisions
//! - Handlers are registered by name at setup; no reflection
//! - `handle` is infallible: faults become error replies at the boundary
//! - Dispatch is a plain synchronous call; timeouts live in the
//!   transport layer

pub mod context;
pub mod dispatcher;
pub mod registry;

pub use context::Context;
pub use dispatcher::Dispatcher;
pub use registry::{ActionError, HandlerRegistry, MissingDispatchTarget};
