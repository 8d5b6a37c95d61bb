//! Application State - Stato globale dell'applicazione
//!
//! Holds only the connection pool: repositories are units of work and are
//! built fresh for every request.

use crate::repositories::{NumeroVillaRepository, VillaRepository};
use sqlx::SqlitePool;

/// Stato globale dell'applicazione condiviso tra tutte le route
pub struct AppState {
    /// Pool di connessioni SQLite condiviso
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// New villa unit of work
    pub fn villas(&self) -> VillaRepository {
        VillaRepository::new(self.pool.clone())
    }

    /// New villa-number unit of work
    pub fn numero_villas(&self) -> NumeroVillaRepository {
        NumeroVillaRepository::new(self.pool.clone())
    }
}
