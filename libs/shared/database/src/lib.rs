//! SQLite access for the turnero.
//!
//! One database file, WAL journal mode, a small connection pool and additive
//! startup migrations. Mutating units of work run on a `sqlx::Transaction`
//! acquired from the pool: commit on success, rollback on drop for every
//! error path.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::SqliteConnection;
use tracing::info;

use shared_config::AppConfig;

pub mod migrations;

/// Opens the pool against the configured database file and applies all
/// pending migrations. Creates the parent directory and the file on first
/// run.
pub async fn init_db_pool(config: &AppConfig) -> Result<SqlitePool> {
    let db_path = Path::new(&config.database_path);

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .context("no se pudo crear el directorio de la base de datos")?;
        }
    }

    let connection_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
        .pragma("synchronous", "NORMAL");

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connection_options)
        .await
        .context("no se pudo abrir la base de datos SQLite")?;

    migrations::run_migrations(&pool)
        .await
        .context("fallo al aplicar migraciones")?;

    info!("Base de datos inicializada: {}", config.database_path);
    Ok(pool)
}

/// Reads back the identity generated by the last INSERT on this connection.
/// Every service inserts and then asks for the id through here instead of
/// relying on driver-specific return values.
pub async fn last_insert_id(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT last_insert_rowid()")
        .fetch_one(conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn pool_opens_and_migrates() -> Result<()> {
        let temp_dir = tempdir()?;
        let config = AppConfig {
            database_path: temp_dir
                .path()
                .join("test.db")
                .to_string_lossy()
                .into_owned(),
            bind_addr: "127.0.0.1:0".to_string(),
            max_connections: 2,
            busy_timeout_secs: 5,
        };

        let pool = init_db_pool(&config).await?;

        let estaciones: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM estaciones")
            .fetch_one(&pool)
            .await?;
        assert_eq!(estaciones, 8);

        let consultorios: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM consultorios")
            .fetch_one(&pool)
            .await?;
        assert_eq!(consultorios, 5);

        Ok(())
    }

    #[tokio::test]
    async fn insert_then_read_back_identity() -> Result<()> {
        let temp_dir = tempdir()?;
        let config = AppConfig {
            database_path: temp_dir
                .path()
                .join("ids.db")
                .to_string_lossy()
                .into_owned(),
            bind_addr: "127.0.0.1:0".to_string(),
            max_connections: 2,
            busy_timeout_secs: 5,
        };
        let pool = init_db_pool(&config).await?;

        let mut tx = pool.begin().await?;
        sqlx::query("INSERT INTO doctores (nombre, especialidad) VALUES (?, ?)")
            .bind("Dra. Rivas")
            .bind("Oftalmología")
            .execute(&mut *tx)
            .await?;
        let id = last_insert_id(&mut tx).await?;
        tx.commit().await?;

        assert!(id > 0);
        Ok(())
    }
}
