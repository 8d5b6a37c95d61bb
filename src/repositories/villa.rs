//! VillaRepository - Repository per la gestione delle ville

use super::{Repository, RepositoryError, SqlRepository};
use crate::entities::Villa;
use chrono::Utc;
use sqlx::SqlitePool;
use std::ops::{Deref, DerefMut};
use tracing::{debug, instrument};

/// Generic villa CRUD plus the timestamped update
pub struct VillaRepository {
    inner: SqlRepository<Villa>,
}

impl VillaRepository {
    pub fn new(connection_pool: SqlitePool) -> VillaRepository {
        Self {
            inner: SqlRepository::new(connection_pool),
        }
    }

    /// Full replace of the villa, refreshing `fecha_actualizacion`
    ///
    /// `fecha_creacion` on the argument is ignored; the returned villa is the
    /// row as stored.
    #[instrument(skip(self, villa), fields(villa_id = villa.id))]
    pub async fn update(&mut self, mut villa: Villa) -> Result<Villa, RepositoryError> {
        villa.fecha_actualizacion = Utc::now();
        self.inner.replace(&villa).await?;
        self.inner.save().await?;
        debug!("Villa updated");

        self.inner
            .find_by_key(villa.id)
            .await?
            .ok_or(RepositoryError::NotFound {
                table: "Villas",
                key: villa.id,
            })
    }
}

impl Deref for VillaRepository {
    type Target = SqlRepository<Villa>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for VillaRepository {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::VillaRepository;
    use sqlx::SqlitePool;
    use crate::entities::Villa;
    use crate::repositories::{Repository, RepositoryError};
    use chrono::{Duration, Utc};

    #[sqlx::test]
    async fn test_update_refreshes_timestamp_and_keeps_creation(pool: SqlitePool) {
        let mut repo = VillaRepository::new(pool);
        let created_at = Utc::now() - Duration::minutes(5);
        let mut villa = Villa {
            id: 0,
            nombre: "Villa Real".to_string(),
            detalle: String::new(),
            tarifa: 200.0,
            ocupantes: 5,
            area: 60,
            image_url: String::new(),
            amenidad: String::new(),
            fecha_creacion: created_at,
            fecha_actualizacion: created_at,
        };
        repo.create(&mut villa).await.expect("insert");

        let mut replacement = villa.clone();
        replacement.tarifa = 250.0;
        // must not overwrite the stored creation time
        replacement.fecha_creacion = Utc::now();

        let updated = repo.update(replacement).await.expect("update");

        assert_eq!(updated.tarifa, 250.0);
        assert_eq!(updated.fecha_creacion, created_at);
        assert!(updated.fecha_actualizacion > updated.fecha_creacion);
    }

    #[sqlx::test]
    async fn test_update_missing_row_is_not_found(pool: SqlitePool) {
        let mut repo = VillaRepository::new(pool);
        let now = Utc::now();
        let ghost = Villa {
            id: 42,
            nombre: "Villa Fantasma".to_string(),
            detalle: String::new(),
            tarifa: 1.0,
            ocupantes: 0,
            area: 0,
            image_url: String::new(),
            amenidad: String::new(),
            fecha_creacion: now,
            fecha_actualizacion: now,
        };

        let err = repo.update(ghost).await.expect_err("no such row");

        assert!(matches!(err, RepositoryError::NotFound { table: "Villas", key: 42 }));
    }
}
