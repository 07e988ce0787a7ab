//! # mottu-api
//!
//! REST service for the Mottu fleet: motorcycles (`/api/motos`), users
//! (`/api/usuarios`) and addresses (`/api/enderecos`).
//!
//! ## Features
//!
//! - **HATEOAS**: every item and page carries `{rel, href, method}` links
//!   built from the request's scheme and host
//! - **Pagination**: `?page=&pageSize=` clamped to the configured policy
//! - **Auth**: argon2 password hashing, HS256 bearer tokens on the collections
//! - **Storage**: in-memory by default, PostgreSQL with the `database` feature
//! - **Middleware stack**: request ids, sensitive header masking, timeouts,
//!   body limits, compression, CORS and panic recovery
//!
//! ## Example
//!
//! ```rust,no_run
//! use mottu_api::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::builder(config.clone()).build().await?;
//!
//!     Server::new(config).serve(build_router(state)).await
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod hateoas;
pub mod health;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repository;
pub mod responses;
pub mod router;
pub mod server;
pub mod state;

#[cfg(feature = "database")]
pub mod database;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::auth::{Claims, JwtIssuer, PasswordHasher};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::hateoas::{Link, LinkBuilder, PagedResult, Resource};
    pub use crate::health::{health, readiness};
    pub use crate::middleware::JwtAuth;
    pub use crate::models::{Address, Person, Vehicle};
    pub use crate::observability::init_tracing;
    pub use crate::repository::{Entity, MemoryRepository, Repository};
    pub use crate::responses::{Created, NoContent};
    pub use crate::router::build_router;
    pub use crate::server::Server;
    pub use crate::state::{AppState, AppStateBuilder};
}
