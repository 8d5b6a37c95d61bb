//! Entities module - Domain entities persisted in the database
//!
//! Every entity maps one table. The `Entity` trait in `repositories::traits`
//! describes how a row is read and written so the generic repository can work
//! on any of them.

pub mod numero_villa;
pub mod villa;

pub use numero_villa::NumeroVilla;
pub use villa::Villa;
