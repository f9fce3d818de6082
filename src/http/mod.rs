//! HTTP boundary types and the transport adapter.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, middleware, request ID)
//!     → request.rs (RequestHead: method, path, protocol, cookies)
//!     → [dispatch core decides the outcome]
//!     → response.rs (Reply: status, headers, body, session cookies)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{Protocol, RequestHead};
pub use response::Reply;
pub use server::HttpServer;
