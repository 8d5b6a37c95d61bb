use axum_test::TestServer;
use sqlx::SqlitePool;
use std::sync::Arc;
use villa_server::core::AppState;

/// Crea un AppState per i test
///
/// # Arguments
/// * `pool` - Connection pool fornito da `#[sqlx::test]` (schema già migrato)
///
/// # Returns
/// Arc<AppState> configurato sul database di test
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(pool))
}

/// Crea un TestServer per i test
///
/// # Arguments
/// * `state` - AppState da utilizzare per il server
///
/// # Returns
/// TestServer configurato e pronto per eseguire richieste
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = villa_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}
