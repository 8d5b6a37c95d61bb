//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Configurazione
//! - Connessione al database e migrazioni
//! - Gestione errori
//! - Envelope delle risposte
//! - Stato applicazione

pub mod config;
pub mod db;
pub mod error;
pub mod response;
pub mod state;

// Re-exports per facilitare l'import
pub use config::Config;
pub use error::AppError;
pub use response::APIResponse;
pub use state::AppState;
