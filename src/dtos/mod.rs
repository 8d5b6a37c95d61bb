//! DTOs module - Data Transfer Objects
//!
//! I DTO separano la rappresentazione esterna (API) dalle entità persistite.
//! Conversions are plain functions: `From<Entity>` for the read side and
//! `into_entity` for the write side.

pub mod numero_villa;
pub mod villa;

pub use numero_villa::{CreateNumeroVillaDTO, NumeroVillaDTO, UpdateNumeroVillaDTO};
pub use villa::{CreateVillaDTO, UpdateVillaDTO, VillaDTO};
