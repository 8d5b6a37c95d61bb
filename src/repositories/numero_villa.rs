//! NumeroVillaRepository - Repository per i numeri di villa

use super::{Repository, RepositoryError, SqlRepository};
use crate::entities::NumeroVilla;
use chrono::Utc;
use sqlx::SqlitePool;
use std::ops::{Deref, DerefMut};
use tracing::{debug, instrument};

/// Generic room-number CRUD plus the timestamped update
///
/// Does not check that `villa_id` still references a villa; callers must.
pub struct NumeroVillaRepository {
    inner: SqlRepository<NumeroVilla>,
}

impl NumeroVillaRepository {
    pub fn new(connection_pool: SqlitePool) -> NumeroVillaRepository {
        Self {
            inner: SqlRepository::new(connection_pool),
        }
    }

    /// Full replace of the room number, refreshing `fecha_actualizacion`
    #[instrument(skip(self, numero), fields(villa_no = numero.villa_no))]
    pub async fn update(&mut self, mut numero: NumeroVilla) -> Result<NumeroVilla, RepositoryError> {
        numero.fecha_actualizacion = Utc::now();
        self.inner.replace(&numero).await?;
        self.inner.save().await?;
        debug!("Villa number updated");

        self.inner
            .find_by_key(numero.villa_no)
            .await?
            .ok_or(RepositoryError::NotFound {
                table: "NumeroVillas",
                key: numero.villa_no,
            })
    }
}

impl Deref for NumeroVillaRepository {
    type Target = SqlRepository<NumeroVilla>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for NumeroVillaRepository {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::NumeroVillaRepository;
    use crate::entities::NumeroVilla;
    use crate::repositories::Repository;
    use chrono::Utc;
    use sqlx::SqlitePool;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("villas")))]
    async fn test_update_replaces_reference_and_detail(pool: SqlitePool) {
        let mut repo = NumeroVillaRepository::new(pool);
        let now = Utc::now();
        let mut numero = NumeroVilla {
            villa_no: 10,
            villa_id: 1,
            detalle_especial: Some("Vista al mar".to_string()),
            fecha_creacion: now,
            fecha_actualizacion: now,
        };
        repo.create(&mut numero).await.expect("insert");

        numero.villa_id = 2;
        numero.detalle_especial = None;
        let updated = repo.update(numero).await.expect("update");

        assert_eq!(updated.villa_id, 2);
        assert_eq!(updated.detalle_especial, None);
        assert!(updated.fecha_actualizacion >= updated.fecha_creacion);
    }
}
