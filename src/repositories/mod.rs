//! Repositories module - Data access for every entity
//!
//! `SqlRepository<T>` implements the generic `Repository<T>` contract once for
//! any type implementing `Entity`. The entity-specific repositories wrap it by
//! composition and only add what differs per entity (timestamped update).
//!
//! Each repository instance is a short-lived unit of work: build one per
//! request from the shared pool, never share it between requests.
//!
//! Queries are built at run time from the `Entity` column lists, so the crate
//! compiles without a live database. Table and column names only ever come
//! from `&'static str` constants; values are always bound.

pub mod error;
pub mod generic;
pub mod numero_villa;
pub mod tracked;
pub mod traits;
pub mod villa;

pub use error::RepositoryError;
pub use generic::SqlRepository;
pub use numero_villa::NumeroVillaRepository;
pub use tracked::Tracked;
pub use traits::{Entity, Filter, Repository, SqlValue};
pub use villa::VillaRepository;
