//! Services module - Handler HTTP per ogni risorsa
//!
//! Handlers only orchestrate: repository lookups, mapping, patch pipeline and
//! the response envelope. Every failure goes through `AppError`.

pub mod numero_villa;
pub mod villa;

pub use numero_villa::{
    create_numero_villa, delete_numero_villa, get_numero_villa, list_numero_villas,
    update_numero_villa,
};
pub use villa::{create_villa, delete_villa, get_villa, list_villas, patch_villa, update_villa};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
