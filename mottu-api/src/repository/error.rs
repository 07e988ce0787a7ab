//! Repository error types
//!
//! Structured errors carrying the failed operation, a category and the
//! entity involved, so handlers can map them onto HTTP statuses.
//!
//! # Example
//!
//! ```rust
//! use mottu_api::repository::{RepositoryError, RepositoryErrorKind};
//!
//! let error = RepositoryError::already_exists("Moto", "ABC1234");
//! assert!(matches!(error.kind, RepositoryErrorKind::AlreadyExists));
//! assert_eq!(error.entity_id.as_deref(), Some("ABC1234"));
//! ```

use std::fmt;

use crate::error::Error;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Looking up one entity by its natural key
    FindByKey,
    /// Reading one page of the collection
    FindPage,
    /// Counting the collection
    Count,
    /// Inserting a new entity
    Create,
    /// Replacing an existing entity
    Update,
    /// Removing an entity
    Delete,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindByKey => write!(f, "find_by_key"),
            Self::FindPage => write!(f, "find_page"),
            Self::Count => write!(f, "count"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Entity was not found
    NotFound,
    /// Entity already exists (duplicate key)
    AlreadyExists,
    /// Failed to reach the backing store
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Underlying database error
    DatabaseError,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
        }
    }
}

/// Structured repository error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The entity label (e.g. "Moto")
    pub entity_type: Option<String>,
    /// The natural key of the entity involved
    pub entity_id: Option<String>,
}

impl RepositoryError {
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// An update or delete targeted a key that is not stored
    pub fn not_found(
        operation: RepositoryOperation,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self::new(operation, RepositoryErrorKind::NotFound, "Entity not found")
            .with_entity(entity_type, entity_id)
    }

    /// A create collided with a stored key
    pub fn already_exists(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::new(
            RepositoryOperation::Create,
            RepositoryErrorKind::AlreadyExists,
            "Entity already exists",
        )
        .with_entity(entity_type, entity_id)
    }

    pub fn connection_failed(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::ConnectionFailed, message)
    }

    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    pub fn database_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DatabaseError, message)
    }

    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Check if this error is transient
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout
        )
    }

    /// Client-facing duplicate message: `"{entity} {key} já existe."`
    pub fn conflict_message(&self) -> String {
        format!(
            "{} {} já existe.",
            self.entity_type.as_deref().unwrap_or("Registro"),
            self.entity_id.as_deref().unwrap_or_default()
        )
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err.kind {
            RepositoryErrorKind::NotFound => Error::NotFound(err.to_string()),
            RepositoryErrorKind::AlreadyExists => Error::Conflict(err.conflict_message()),
            _ => {
                tracing::error!(
                    operation = %err.operation,
                    kind = %err.kind,
                    retriable = err.is_retriable(),
                    "Repository error: {}", err.message
                );
                Error::Internal(err.to_string())
            }
        }
    }
}

#[cfg(feature = "database")]
impl RepositoryError {
    /// Classify a sqlx failure for the given operation
    pub fn from_sqlx(operation: RepositoryOperation, err: sqlx::Error) -> Self {
        use sqlx::Error as E;
        match err {
            E::PoolTimedOut => Self::timeout(operation, "Connection pool timed out"),
            E::PoolClosed => Self::connection_failed(operation, "Connection pool is closed"),
            E::Io(e) => Self::connection_failed(operation, e.to_string()),
            E::Tls(e) => Self::connection_failed(operation, format!("TLS error: {}", e)),
            E::WorkerCrashed => Self::connection_failed(operation, "Database worker crashed"),
            other => Self::database_error(operation, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_operation_display() {
        assert_eq!(RepositoryOperation::FindByKey.to_string(), "find_by_key");
        assert_eq!(RepositoryOperation::FindPage.to_string(), "find_page");
        assert_eq!(RepositoryOperation::Delete.to_string(), "delete");
    }

    #[test]
    fn test_already_exists_convenience() {
        let error = RepositoryError::already_exists("Moto", "ABC1234");
        assert_eq!(error.operation, RepositoryOperation::Create);
        assert_eq!(error.kind, RepositoryErrorKind::AlreadyExists);
        assert_eq!(error.conflict_message(), "Moto ABC1234 já existe.");
    }

    #[test]
    fn test_not_found_convenience() {
        let error = RepositoryError::not_found(RepositoryOperation::Update, "Usuario", "12345678901");
        assert_eq!(error.kind, RepositoryErrorKind::NotFound);
        assert_eq!(error.entity_id.as_deref(), Some("12345678901"));
        assert!(!error.is_retriable());
    }

    #[test]
    fn test_display_includes_entity() {
        let error = RepositoryError::not_found(RepositoryOperation::Delete, "Endereço", "01001000");
        assert_eq!(
            error.to_string(),
            "Repository not_found error during delete: Entity not found [Endereço: 01001000]"
        );
    }

    #[test]
    fn test_retriable_kinds() {
        assert!(RepositoryError::timeout(RepositoryOperation::Count, "slow").is_retriable());
        assert!(
            RepositoryError::connection_failed(RepositoryOperation::Count, "refused").is_retriable()
        );
        assert!(!RepositoryError::database_error(RepositoryOperation::Count, "syntax").is_retriable());
    }

    #[test]
    fn test_into_api_error() {
        let conflict: Error = RepositoryError::already_exists("Endereço", "01001000").into();
        assert!(matches!(conflict, Error::Conflict(ref m) if m == "Endereço 01001000 já existe."));

        let missing: Error =
            RepositoryError::not_found(RepositoryOperation::Update, "Moto", "XYZ9876").into();
        assert!(matches!(missing, Error::NotFound(_)));

        let broken: Error =
            RepositoryError::database_error(RepositoryOperation::FindPage, "boom").into();
        assert!(matches!(broken, Error::Internal(_)));
    }
}
