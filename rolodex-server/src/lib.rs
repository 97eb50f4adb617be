//! HTTP transport for the Rolodex contact service.
//!
//! Routes live in [`routes`], request handlers in [`handlers`], and shared
//! runtime state plus error mapping in [`infra`].

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use infra::errors::{AppError, AppResult};
pub use routes::create_app;
