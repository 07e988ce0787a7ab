//! Repository trait definitions
//!
//! - [`Entity`]: a record identified by a natural string key
//! - [`Repository`]: key-ordered CRUD over one entity type
//!
//! The trait is object safe (via `async_trait`) so application state can
//! hold `Arc<dyn Repository<E>>` and swap storage backends at startup.

use async_trait::async_trait;

use super::error::RepositoryError;
use super::pagination::Pagination;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// A stored record with a natural primary key
pub trait Entity: Clone + Send + Sync + 'static {
    /// Label used in log lines and conflict messages, e.g. "Moto"
    const NAME: &'static str;

    /// The natural primary key (plate, cpf, postal code)
    fn key(&self) -> &str;
}

/// CRUD operations over one entity type, ordered by key ascending
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// `Ok(None)` when no entity has this key
    async fn find_by_key(&self, key: &str) -> RepositoryResult<Option<E>>;

    /// Skip `pagination.offset` entities by ascending key, take up to
    /// `pagination.limit`
    async fn find_page(&self, pagination: Pagination) -> RepositoryResult<Vec<E>>;

    async fn count(&self) -> RepositoryResult<u64>;

    /// Insert a new entity
    ///
    /// Fails with [`RepositoryErrorKind::AlreadyExists`](super::RepositoryErrorKind::AlreadyExists)
    /// when the key is taken. The check and the insert are atomic.
    async fn create(&self, entity: E) -> RepositoryResult<E>;

    /// Replace the stored entity with the same key
    ///
    /// Fails with [`RepositoryErrorKind::NotFound`](super::RepositoryErrorKind::NotFound)
    /// when no entity has this key.
    async fn update(&self, entity: E) -> RepositoryResult<E>;

    /// Returns whether an entity was removed
    async fn delete(&self, key: &str) -> RepositoryResult<bool>;
}
