//! SqlRepository - Generic implementation of `Repository<T>` over SQLite

use super::{Entity, Filter, Repository, RepositoryError, SqlValue, Tracked};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Sqlite, SqlitePool};
use tracing::{debug, instrument};

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

fn bind_value(query: SqliteQuery<'_>, value: SqlValue) -> SqliteQuery<'_> {
    match value {
        SqlValue::Integer(v) => query.bind(v),
        SqlValue::Real(v) => query.bind(v),
        SqlValue::Text(v) => query.bind(v),
        SqlValue::OptionalText(v) => query.bind(v),
        SqlValue::Timestamp(v) => query.bind(v),
    }
}

fn bind_all(query: SqliteQuery<'_>, values: Vec<SqlValue>) -> SqliteQuery<'_> {
    values.into_iter().fold(query, bind_value)
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Unit of work over the table of `T`
pub struct SqlRepository<T: Entity> {
    connection_pool: SqlitePool,
    tracked: Vec<Tracked<T>>,
}

impl<T: Entity> SqlRepository<T> {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self {
            connection_pool,
            tracked: Vec::new(),
        }
    }

    /// Reads a single row by primary key
    pub async fn find_by_key(&self, key: i64) -> Result<Option<T>, RepositoryError> {
        let sql = format!("SELECT * FROM {} WHERE {} = ?", T::TABLE, T::KEY_COLUMN);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(key)
            .fetch_optional(&self.connection_pool)
            .await?;

        Ok(row)
    }

    /// Overwrites every mutable column of the row with the entity's key
    ///
    /// Insert-only columns are left untouched. Fails with `NotFound` when no
    /// row has the key.
    pub async fn replace(&self, entity: &T) -> Result<(), RepositoryError> {
        let assignments = T::COLUMNS
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            T::TABLE,
            assignments,
            T::KEY_COLUMN
        );

        let result = bind_all(sqlx::query(&sql), entity.column_values())
            .bind(entity.key())
            .execute(&self.connection_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound {
                table: T::TABLE,
                key: entity.key(),
            });
        }

        Ok(())
    }

    async fn first_match(&self, filter: Option<Filter<'_, T>>) -> Result<Option<T>, RepositoryError> {
        Ok(self.list(filter).await?.into_iter().next())
    }
}

impl<T: Entity> Repository<T> for SqlRepository<T> {
    #[instrument(skip(self, entity), fields(table = T::TABLE))]
    async fn create(&mut self, entity: &mut T) -> Result<(), RepositoryError> {
        let mut columns: Vec<&str> = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();

        if !T::KEY_GENERATED {
            columns.push(T::KEY_COLUMN);
            values.push(SqlValue::Integer(entity.key()));
        }
        columns.extend(T::INSERT_ONLY_COLUMNS);
        values.extend(entity.insert_only_values());
        columns.extend(T::COLUMNS);
        values.extend(entity.column_values());

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            T::TABLE,
            columns.join(", "),
            placeholders(columns.len())
        );

        let result = bind_all(sqlx::query(&sql), values)
            .execute(&self.connection_pool)
            .await?;

        if T::KEY_GENERATED {
            entity.assign_key(result.last_insert_rowid());
        }
        debug!(key = entity.key(), "Row inserted");

        self.save().await
    }

    async fn list(&self, filter: Option<Filter<'_, T>>) -> Result<Vec<T>, RepositoryError> {
        let rows = match filter.as_ref().and_then(Filter::key_lookup) {
            Some(key) => self.find_by_key(key).await?.into_iter().collect(),
            None => {
                let sql = format!("SELECT * FROM {} ORDER BY {}", T::TABLE, T::KEY_COLUMN);
                sqlx::query_as::<_, T>(&sql)
                    .fetch_all(&self.connection_pool)
                    .await?
            }
        };

        Ok(match filter {
            Some(filter) => rows.into_iter().filter(|row| filter.matches(row)).collect(),
            None => rows,
        })
    }

    async fn get_tracked(
        &mut self,
        filter: Option<Filter<'_, T>>,
    ) -> Result<Option<Tracked<T>>, RepositoryError> {
        let Some(entity) = self.first_match(filter).await? else {
            return Ok(None);
        };

        let tracked = Tracked::new(entity);
        self.tracked.push(tracked.clone());
        Ok(Some(tracked))
    }

    async fn get_detached(
        &self,
        filter: Option<Filter<'_, T>>,
    ) -> Result<Option<T>, RepositoryError> {
        self.first_match(filter).await
    }

    #[instrument(skip(self, entity), fields(table = T::TABLE, key = entity.key()))]
    async fn remove(&mut self, entity: &T) -> Result<(), RepositoryError> {
        let sql = format!("DELETE FROM {} WHERE {} = ?", T::TABLE, T::KEY_COLUMN);
        let result = sqlx::query(&sql)
            .bind(entity.key())
            .execute(&self.connection_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound {
                table: T::TABLE,
                key: entity.key(),
            });
        }

        let key = entity.key();
        self.tracked.retain(|tracked| tracked.get().key() != key);
        debug!("Row deleted");

        self.save().await
    }

    async fn save(&mut self) -> Result<(), RepositoryError> {
        for tracked in &self.tracked {
            if let Some(current) = tracked.pending() {
                self.replace(&current).await?;
                tracked.mark_saved(current);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqlRepository;
    use sqlx::SqlitePool;
    use crate::entities::{NumeroVilla, Villa};
    use crate::repositories::{Filter, Repository, RepositoryError};
    use chrono::Utc;

    fn villa(nombre: &str, tarifa: f64) -> Villa {
        let now = Utc::now();
        Villa {
            id: 0,
            nombre: nombre.to_string(),
            detalle: format!("Detalle {nombre}"),
            tarifa,
            ocupantes: 4,
            area: 50,
            image_url: String::new(),
            amenidad: String::new(),
            fecha_creacion: now,
            fecha_actualizacion: now,
        }
    }

    fn numero(villa_no: i64, villa_id: i64) -> NumeroVilla {
        let now = Utc::now();
        NumeroVilla {
            villa_no,
            villa_id,
            detalle_especial: None,
            fecha_creacion: now,
            fecha_actualizacion: now,
        }
    }

    #[sqlx::test]
    async fn test_create_assigns_fresh_keys(pool: SqlitePool) {
        let mut repo = SqlRepository::<Villa>::new(pool);

        let mut first = villa("Villa Uno", 100.0);
        let mut second = villa("Villa Due", 120.0);
        repo.create(&mut first).await.expect("insert first");
        repo.create(&mut second).await.expect("insert second");

        assert!(first.id > 0);
        assert!(second.id > first.id);

        let stored = repo.find_by_key(second.id).await.expect("read").expect("row exists");
        assert_eq!(stored.nombre, "Villa Due");
        assert_eq!(stored.fecha_creacion, second.fecha_creacion);
    }

    #[sqlx::test]
    async fn test_deleted_keys_are_not_reused(pool: SqlitePool) {
        let mut repo = SqlRepository::<Villa>::new(pool);

        let mut first = villa("Villa Uno", 100.0);
        repo.create(&mut first).await.expect("insert");
        repo.remove(&first).await.expect("delete");

        let mut second = villa("Villa Due", 100.0);
        repo.create(&mut second).await.expect("insert");
        assert!(second.id > first.id);
    }

    #[sqlx::test]
    async fn test_list_filters_and_is_stable(pool: SqlitePool) {
        let mut repo = SqlRepository::<Villa>::new(pool);
        for (nombre, tarifa) in [("Villa A", 90.0), ("Villa B", 210.0), ("Villa C", 300.0)] {
            repo.create(&mut villa(nombre, tarifa)).await.expect("insert");
        }

        let expensive = || Filter::new(|v: &Villa| v.tarifa > 200.0);
        let once = repo.list(Some(expensive())).await.expect("list");
        let twice = repo.list(Some(expensive())).await.expect("list");

        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
        assert_eq!(repo.list(None).await.expect("list").len(), 3);

        let none = repo
            .list(Some(Filter::new(|v: &Villa| v.nombre == "Villa Z")))
            .await
            .expect("list");
        assert!(none.is_empty());
    }

    #[sqlx::test]
    async fn test_get_returns_none_when_absent(pool: SqlitePool) {
        let mut repo = SqlRepository::<Villa>::new(pool);

        assert!(repo.get_detached(Some(Filter::key(7))).await.expect("read").is_none());
        assert!(repo.get_tracked(Some(Filter::key(7))).await.expect("read").is_none());
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("villas")))]
    async fn test_key_filter_reads_single_row(pool: SqlitePool) {
        let repo = SqlRepository::<Villa>::new(pool);

        let by_key = repo.list(Some(Filter::key(2))).await.expect("list");
        assert_eq!(by_key.len(), 1);
        assert_eq!(by_key[0].nombre, "Villa Maria");

        let villa = repo
            .get_detached(Some(Filter::key(1)))
            .await
            .expect("read")
            .expect("row exists");
        assert_eq!(villa.nombre, "Villa Real");
    }

    #[test]
    fn test_only_key_filters_carry_a_key() {
        assert_eq!(Filter::<Villa>::key(5).key_lookup(), Some(5));
        assert_eq!(Filter::new(|v: &Villa| v.id == 5).key_lookup(), None);
    }

    #[sqlx::test]
    async fn test_tracked_changes_are_saved(pool: SqlitePool) {
        let mut repo = SqlRepository::<Villa>::new(pool.clone());
        let mut created = villa("Villa Uno", 100.0);
        repo.create(&mut created).await.expect("insert");

        let tracked = repo
            .get_tracked(Some(Filter::key(created.id)))
            .await
            .expect("read")
            .expect("row exists");
        tracked.modify(|v| v.tarifa = 175.0);
        assert!(tracked.is_dirty());

        repo.save().await.expect("save");
        assert!(!tracked.is_dirty());

        let other = SqlRepository::<Villa>::new(pool);
        let stored = other.find_by_key(created.id).await.expect("read").expect("row");
        assert_eq!(stored.tarifa, 175.0);
    }

    #[sqlx::test]
    async fn test_detached_changes_are_not_saved(pool: SqlitePool) {
        let mut repo = SqlRepository::<Villa>::new(pool);
        let mut created = villa("Villa Uno", 100.0);
        repo.create(&mut created).await.expect("insert");

        let mut detached = repo
            .get_detached(Some(Filter::key(created.id)))
            .await
            .expect("read")
            .expect("row exists");
        detached.tarifa = 999.0;
        repo.save().await.expect("save");

        let stored = repo.find_by_key(created.id).await.expect("read").expect("row");
        assert_eq!(stored.tarifa, 100.0);
    }

    #[sqlx::test]
    async fn test_remove_twice_is_not_masked(pool: SqlitePool) {
        let mut repo = SqlRepository::<Villa>::new(pool);
        let mut created = villa("Villa Uno", 100.0);
        repo.create(&mut created).await.expect("insert");

        repo.remove(&created).await.expect("first delete");
        let err = repo.remove(&created).await.expect_err("second delete");

        assert!(matches!(err, RepositoryError::NotFound { key, .. } if key == created.id));
    }

    #[sqlx::test]
    async fn test_removed_tracked_entity_is_forgotten(pool: SqlitePool) {
        let mut repo = SqlRepository::<Villa>::new(pool);
        let mut created = villa("Villa Uno", 100.0);
        repo.create(&mut created).await.expect("insert");

        let tracked = repo
            .get_tracked(Some(Filter::key(created.id)))
            .await
            .expect("read")
            .expect("row exists");
        tracked.modify(|v| v.area = 10);
        repo.remove(&tracked.get()).await.expect("delete");

        repo.save().await.expect("nothing left to write");
    }

    #[sqlx::test]
    async fn test_caller_supplied_keys_and_constraints(pool: SqlitePool) {
        let mut villas = SqlRepository::<Villa>::new(pool.clone());
        let mut parent = villa("Villa Uno", 100.0);
        villas.create(&mut parent).await.expect("insert villa");

        let mut numeros = SqlRepository::<NumeroVilla>::new(pool);
        let mut room = numero(101, parent.id);
        numeros.create(&mut room).await.expect("insert number");
        assert_eq!(room.villa_no, 101);

        let duplicate = numeros.create(&mut numero(101, parent.id)).await;
        assert!(matches!(duplicate, Err(RepositoryError::Persistence(_))));

        let orphan = numeros.create(&mut numero(102, parent.id + 100)).await;
        assert!(matches!(orphan, Err(RepositoryError::Persistence(_))));
    }

    #[sqlx::test]
    async fn test_deleting_villa_cascades_to_numbers(pool: SqlitePool) {
        let mut villas = SqlRepository::<Villa>::new(pool.clone());
        let mut parent = villa("Villa Uno", 100.0);
        villas.create(&mut parent).await.expect("insert villa");
        let mut numeros = SqlRepository::<NumeroVilla>::new(pool);
        numeros.create(&mut numero(201, parent.id)).await.expect("insert number");

        villas.remove(&parent).await.expect("delete villa");

        assert!(numeros.list(None).await.expect("list").is_empty());
    }
}
