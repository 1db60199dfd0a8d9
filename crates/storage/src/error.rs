use thiserror::Error;

use crate::models::EventStatus;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Invalid point table: {0}")]
    InvalidPointTable(String),

    #[error("No active tournament")]
    NoActiveTournament,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: EventStatus, to: EventStatus },

    #[error("{0}")]
    BusinessRule(String),

    #[error("Record was modified by another process, retry")]
    Conflict,
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }

    /// Violation of the named table constraint
    pub fn violates(&self, constraint: &str) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.constraint() == Some(constraint)
        )
    }

    /// Serialization failures and lock timeouts raised by concurrent writers.
    pub fn is_concurrent_modification(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if matches!(e.code().as_deref(), Some("40001") | Some("40P01") | Some("55P03"))
        )
    }

    pub fn unique_as(self, message: &str) -> Self {
        if self.is_unique_violation() {
            StorageError::ConstraintViolation(message.to_string())
        } else {
            self
        }
    }

    pub fn foreign_key_as(self, message: &str) -> Self {
        if self.is_foreign_key_violation() {
            StorageError::ConstraintViolation(message.to_string())
        } else {
            self
        }
    }

    pub fn concurrent_as_conflict(self) -> Self {
        if self.is_concurrent_modification() {
            StorageError::Conflict
        } else {
            self
        }
    }
}
