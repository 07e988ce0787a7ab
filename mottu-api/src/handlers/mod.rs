//! HTTP handlers
//!
//! Entity collections share one generic implementation in [`collection`],
//! bound to each model in `resources`.

pub mod auth;
pub mod collection;
mod extract;
mod resources;

pub use collection::CollectionResource;
pub use extract::{QueryParams, ValidJson};
