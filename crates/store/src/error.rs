use thiserror::Error;

/// Errors that can occur when interacting with the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated while committing a change-set.
    #[error("unique constraint violation on {entity}: {key}")]
    UniqueViolation { entity: &'static str, key: String },

    /// A referenced row does not exist.
    #[error("foreign key violation on {entity}: {key}")]
    ForeignKeyViolation { entity: &'static str, key: String },

    /// A check constraint was violated (e.g. negative stock units).
    #[error("check constraint violation on {entity}: {key}")]
    CheckViolation { entity: &'static str, key: String },

    /// An update or delete targeted a row that does not exist.
    #[error("row not found in {entity}: {key}")]
    RowNotFound { entity: &'static str, key: String },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Returns true for failures caused by a constraint on the data
    /// (uniqueness, referential integrity, checks, missing target rows),
    /// as opposed to an unexpected database failure.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StoreError::UniqueViolation { .. }
                | StoreError::ForeignKeyViolation { .. }
                | StoreError::CheckViolation { .. }
                | StoreError::RowNotFound { .. }
        )
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
