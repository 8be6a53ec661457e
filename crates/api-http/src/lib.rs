//! HTTP API Layer
//!
//! Serves the game data API and the management API over plain HTTP/1.1.

pub mod context;
pub mod error;
pub mod handler;
pub mod response;
pub mod server;
pub mod types;

pub use context::AppContext;
pub use error::ServerError;
pub use handler::{GameApiHandler, ManagementHandler, Router};
pub use server::{HttpServer, HttpServerConfig, RunningServer};
