//! Keyed entity storage
//!
//! [`Repository`] is the seam between handlers and storage. Handlers hold
//! an `Arc<dyn Repository<E>>`; the default backing is [`MemoryRepository`],
//! and PostgreSQL implementations are available with the `database` feature.
//!
//! ```rust,ignore
//! use mottu_api::repository::{MemoryRepository, Pagination, Repository};
//!
//! let repo = MemoryRepository::<Vehicle>::new();
//! repo.create(vehicle).await?;
//! let first_page = repo.find_page(Pagination::page(1, 10)).await?;
//! ```

mod error;
mod memory;
mod pagination;
mod traits;

#[cfg(feature = "database")]
pub mod postgres;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::MemoryRepository;
pub use pagination::Pagination;
pub use traits::{Entity, Repository, RepositoryResult};
