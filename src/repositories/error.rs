//! Repository errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No row with the given key exists in `table`
    #[error("no row with key {key} in {table}")]
    NotFound { table: &'static str, key: i64 },

    /// Unexpected storage failure, including constraint violations
    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}
