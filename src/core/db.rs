//! Database bootstrap - pool, migrations and sample data

use super::Config;
use crate::entities::Villa;
use crate::repositories::{Repository, RepositoryError, VillaRepository};
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Schema migrations embedded at compile time
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens the connection pool described by the configuration
pub async fn connect(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .max_lifetime(Duration::from_secs(config.connection_lifetime_secs))
        .connect_with(options)
        .await
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    debug!("Migrations applied");
    Ok(())
}

/// Inserts the two sample villas when the table is empty
///
/// # Returns
/// Number of villas inserted
#[instrument(skip(pool))]
pub async fn seed_sample_villas(pool: &SqlitePool) -> Result<usize, RepositoryError> {
    let mut villas = VillaRepository::new(pool.clone());
    if !villas.list(None).await?.is_empty() {
        debug!("Villas table not empty, skipping sample data");
        return Ok(0);
    }

    let now = Utc::now();
    let mut samples = [
        Villa {
            id: 0,
            nombre: "Villa Real".to_string(),
            detalle: "Detalle Villa Real".to_string(),
            tarifa: 200.0,
            ocupantes: 5,
            area: 60,
            image_url: String::new(),
            amenidad: String::new(),
            fecha_creacion: now,
            fecha_actualizacion: now,
        },
        Villa {
            id: 0,
            nombre: "Villa Maria".to_string(),
            detalle: "Detalle Villa Maria".to_string(),
            tarifa: 150.0,
            ocupantes: 3,
            area: 45,
            image_url: String::new(),
            amenidad: String::new(),
            fecha_creacion: now,
            fecha_actualizacion: now,
        },
    ];

    for villa in &mut samples {
        villas.create(villa).await?;
    }

    info!("Seeded {} sample villas", samples.len());
    Ok(samples.len())
}

#[cfg(test)]
mod tests {
    use super::seed_sample_villas;
    use crate::repositories::{Repository, VillaRepository};
    use sqlx::SqlitePool;

    #[sqlx::test]
    async fn test_seed_inserts_sample_villas_once(pool: SqlitePool) {
        assert_eq!(seed_sample_villas(&pool).await.expect("first seed"), 2);
        assert_eq!(seed_sample_villas(&pool).await.expect("second seed"), 0);

        let villas = VillaRepository::new(pool).list(None).await.expect("list");
        let names: Vec<_> = villas.iter().map(|v| v.nombre.as_str()).collect();
        assert_eq!(names, ["Villa Real", "Villa Maria"]);
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("villas")))]
    async fn test_seed_skips_populated_table(pool: SqlitePool) {
        assert_eq!(seed_sample_villas(&pool).await.expect("seed"), 0);
    }
}
