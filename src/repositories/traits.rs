//! Common repository traits
//!
//! This module defines the generic data-access contract and the row-level
//! description every persisted entity provides.

use super::{RepositoryError, Tracked};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::sqlite::SqliteRow;

/// A single column value ready to be bound to a statement
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Real(f64),
    Text(String),
    OptionalText(Option<String>),
    Timestamp(DateTime<Utc>),
}

/// Row-level description of a persisted entity
///
/// `COLUMNS` and `column_values` must list the same columns in the same
/// order; the same holds for `INSERT_ONLY_COLUMNS` and `insert_only_values`.
pub trait Entity:
    for<'r> FromRow<'r, SqliteRow> + Clone + PartialEq + Send + Sync + Unpin + 'static
{
    /// Table holding the rows
    const TABLE: &'static str;

    /// Primary key column
    const KEY_COLUMN: &'static str;

    /// `true` when the database assigns the key on insert
    const KEY_GENERATED: bool;

    /// Columns written on insert and never touched by an update
    const INSERT_ONLY_COLUMNS: &'static [&'static str];

    /// Columns written on insert and on every full-row update
    const COLUMNS: &'static [&'static str];

    fn key(&self) -> i64;

    fn assign_key(&mut self, key: i64);

    fn insert_only_values(&self) -> Vec<SqlValue>;

    fn column_values(&self) -> Vec<SqlValue>;
}

/// Predicate used to narrow reads
///
/// A filter built with `Filter::key` is answered by a primary-key lookup;
/// any other predicate runs against fully materialized rows.
pub struct Filter<'a, T> {
    key: Option<i64>,
    predicate: Box<dyn Fn(&T) -> bool + Send + Sync + 'a>,
}

impl<'a, T> Filter<'a, T> {
    pub fn new(predicate: impl Fn(&T) -> bool + Send + Sync + 'a) -> Self {
        Self {
            key: None,
            predicate: Box::new(predicate),
        }
    }

    pub fn matches(&self, entity: &T) -> bool {
        (self.predicate)(entity)
    }

    /// Primary key the filter is restricted to, if any
    pub fn key_lookup(&self) -> Option<i64> {
        self.key
    }
}

impl<T: Entity> Filter<'static, T> {
    /// Matches the row whose primary key equals `key`
    pub fn key(key: i64) -> Self {
        Self {
            key: Some(key),
            predicate: Box::new(move |entity: &T| entity.key() == key),
        }
    }
}

/// Generic CRUD contract over a single table
///
/// # Type Parameters
/// * `T` - Entity stored in the table
#[allow(async_fn_in_trait)]
pub trait Repository<T: Entity> {
    /// Inserts a new row and commits pending writes
    ///
    /// # Arguments
    /// * `entity` - Entity to insert; receives the generated key when
    ///   `T::KEY_GENERATED` is set
    ///
    /// # Returns
    /// * `Ok(())` - Row inserted
    /// * `Err(RepositoryError::Persistence)` - Constraint violation or storage failure
    async fn create(&mut self, entity: &mut T) -> Result<(), RepositoryError>;

    /// Reads every row matching the optional filter, ordered by key
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - Matching rows, empty when nothing matches
    /// * `Err(RepositoryError)` - Error during reading
    async fn list(&self, filter: Option<Filter<'_, T>>) -> Result<Vec<T>, RepositoryError>;

    /// Reads the first matching row and tracks it
    ///
    /// Changes made through the returned handle are written by the next `save`.
    ///
    /// # Returns
    /// * `Ok(Some(Tracked<T>))` - Row found
    /// * `Ok(None)` - No row matches
    /// * `Err(RepositoryError)` - Error during reading
    async fn get_tracked(
        &mut self,
        filter: Option<Filter<'_, T>>,
    ) -> Result<Option<Tracked<T>>, RepositoryError>;

    /// Reads the first matching row as an independent copy
    ///
    /// The copy is never written back implicitly.
    ///
    /// # Returns
    /// * `Ok(Some(T))` - Row found
    /// * `Ok(None)` - No row matches
    /// * `Err(RepositoryError)` - Error during reading
    async fn get_detached(
        &self,
        filter: Option<Filter<'_, T>>,
    ) -> Result<Option<T>, RepositoryError>;

    /// Deletes the row with the entity's key and commits pending writes
    ///
    /// # Returns
    /// * `Ok(())` - Row deleted
    /// * `Err(RepositoryError::NotFound)` - The row was already gone
    /// * `Err(RepositoryError::Persistence)` - Error during deletion
    async fn remove(&mut self, entity: &T) -> Result<(), RepositoryError>;

    /// Writes every tracked entity changed since it was loaded
    ///
    /// # Returns
    /// * `Ok(())` - All pending writes committed
    /// * `Err(RepositoryError)` - A write failed; the remaining entities stay dirty
    async fn save(&mut self) -> Result<(), RepositoryError>;
}
