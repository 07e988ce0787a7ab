//! In-memory repository backed by an ordered map

use std::collections::btree_map::{self, BTreeMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::Pagination;
use super::traits::{Entity, Repository, RepositoryResult};

/// Process-local storage used when no database is configured
///
/// Entities live in a `BTreeMap` keyed by their natural key, so iteration
/// order is ascending key order. Writers take the lock exclusively, which
/// makes duplicate detection in [`Repository::create`] atomic.
#[derive(Debug)]
pub struct MemoryRepository<E> {
    entries: RwLock<BTreeMap<String, E>>,
}

impl<E: Entity> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Seed the repository, later duplicates replacing earlier ones
    pub fn with_entities(entities: impl IntoIterator<Item = E>) -> Self {
        let entries = entities
            .into_iter()
            .map(|entity| (entity.key().to_string(), entity))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn find_by_key(&self, key: &str) -> RepositoryResult<Option<E>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn find_page(&self, pagination: Pagination) -> RepositoryResult<Vec<E>> {
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .skip(pagination.offset_usize())
            .take(pagination.limit_usize())
            .cloned()
            .collect())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.entries.read().await.len() as u64)
    }

    async fn create(&self, entity: E) -> RepositoryResult<E> {
        let mut entries = self.entries.write().await;
        match entries.entry(entity.key().to_string()) {
            btree_map::Entry::Occupied(slot) => {
                Err(RepositoryError::already_exists(E::NAME, slot.key().as_str()))
            }
            btree_map::Entry::Vacant(slot) => {
                slot.insert(entity.clone());
                Ok(entity)
            }
        }
    }

    async fn update(&self, entity: E) -> RepositoryResult<E> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(entity.key()) {
            Some(stored) => {
                *stored = entity.clone();
                Ok(entity)
            }
            None => Err(RepositoryError::not_found(
                RepositoryOperation::Update,
                E::NAME,
                entity.key(),
            )),
        }
    }

    async fn delete(&self, key: &str) -> RepositoryResult<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }
}
