//! Villa server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod patch;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use self::core::{APIResponse, AppError, AppState, config};
pub use services::root;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(configure_villa_routes())
        .merge(configure_numero_villa_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Configura le routes per la gestione delle ville
fn configure_villa_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/api/villa", get(list_villas).post(create_villa))
        .route(
            "/api/villa/{id}",
            get(get_villa)
                .put(update_villa)
                .patch(patch_villa)
                .delete(delete_villa),
        )
}

/// Configura le routes per i numeri di villa (no patch)
fn configure_numero_villa_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route(
            "/api/numero-villa",
            get(list_numero_villas).post(create_numero_villa),
        )
        .route(
            "/api/numero-villa/{id}",
            get(get_numero_villa)
                .put(update_numero_villa)
                .delete(delete_numero_villa),
        )
}
