use anyhow::Result;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::models::HistorialEntry;

/// Appends one audit row. Runs on the caller's connection so the append
/// commits or rolls back together with the state change it describes.
pub async fn registrar_historial(
    conn: &mut SqliteConnection,
    turno_id: i64,
    accion: &str,
    detalles: &str,
    usuario: &str,
) -> Result<()> {
    sqlx::query("INSERT INTO historial_turnos (turno_id, accion, detalles, usuario) VALUES (?, ?, ?, ?)")
        .bind(turno_id)
        .bind(accion)
        .bind(detalles)
        .bind(usuario)
        .execute(conn)
        .await?;
    debug!("historial: turno {} {}", turno_id, accion);
    Ok(())
}

pub async fn historial_de_turno(pool: &SqlitePool, turno_id: i64) -> Result<Vec<HistorialEntry>> {
    let entries = sqlx::query_as::<_, HistorialEntry>(
        "SELECT id, turno_id, accion, detalles, timestamp, usuario
         FROM historial_turnos WHERE turno_id = ? ORDER BY timestamp ASC, id ASC",
    )
    .bind(turno_id)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}
