use chrono::Utc;
use sqlx::SqliteConnection;

use shared_models::AppError;

/// Appends one timestamped line to the turno's note log. The log is a
/// denormalized display cache: it only ever grows, the audit trail proper
/// lives in `historial_turnos`.
pub async fn append_nota(
    conn: &mut SqliteConnection,
    turno_id: i64,
    texto: &str,
) -> Result<(), AppError> {
    let linea = format!("[{}] {}", Utc::now().format("%Y-%m-%d %H:%M"), texto);
    sqlx::query(
        "UPDATE turnos
         SET notas = CASE WHEN notas = '' THEN ? ELSE notas || char(10) || ? END
         WHERE id = ?",
    )
    .bind(&linea)
    .bind(&linea)
    .bind(turno_id)
    .execute(conn)
    .await?;
    Ok(())
}
