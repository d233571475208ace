use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use shared_models::{AppError, Estacion, EstadoDoctor, TurnoStatus};
use stats_cell::registrar_historial;

use crate::models::TurnoEnCola;

/// The doctor's pending queue, FIFO by creation time.
pub async fn turnos_pendientes(pool: &SqlitePool, doctor_id: i64) -> Result<Vec<TurnoEnCola>, AppError> {
    let turnos = sqlx::query_as::<_, TurnoEnCola>(
        "SELECT t.id, t.numero, t.paciente_nombre, t.paciente_edad, t.tipo, t.estado,
                t.estacion_actual, e.nombre AS estacion_actual_nombre,
                t.prioridad, t.timestamp_creacion, t.notas
         FROM turnos t
         LEFT JOIN estaciones e ON t.estacion_actual = e.id
         WHERE t.doctor_asignado = ? AND t.estado = 'PENDIENTE'
         ORDER BY t.timestamp_creacion ASC, t.id ASC",
    )
    .bind(doctor_id)
    .fetch_all(pool)
    .await?;
    Ok(turnos)
}

/// Calls the oldest pending patient into the consultation. `Ok(None)` means
/// an empty queue: a non-fatal condition, not an error.
pub async fn llamar_siguiente(
    pool: &SqlitePool,
    doctor_id: i64,
) -> Result<Option<TurnoEnCola>, AppError> {
    let mut tx = pool.begin().await?;

    let turno: Option<TurnoEnCola> = sqlx::query_as(
        "SELECT t.id, t.numero, t.paciente_nombre, t.paciente_edad, t.tipo, t.estado,
                t.estacion_actual, e.nombre AS estacion_actual_nombre,
                t.prioridad, t.timestamp_creacion, t.notas
         FROM turnos t
         LEFT JOIN estaciones e ON t.estacion_actual = e.id
         WHERE t.doctor_asignado = ? AND t.estado = 'PENDIENTE'
         ORDER BY t.timestamp_creacion ASC, t.id ASC
         LIMIT 1",
    )
    .bind(doctor_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(mut turno) = turno else {
        return Ok(None);
    };

    sqlx::query(
        "UPDATE turnos SET estado = ?, timestamp_atencion = ?, estacion_actual = ? WHERE id = ?",
    )
    .bind(TurnoStatus::EnAtencion.as_str())
    .bind(Utc::now().naive_utc())
    .bind(Estacion::Consulta.id())
    .bind(turno.id)
    .execute(&mut *tx)
    .await?;

    // The doctor is now mid-consultation.
    let (activo, disponible) = EstadoDoctor::Ocupado.flags();
    sqlx::query("UPDATE doctores SET activo = ?, disponible = ?, estado_detallado = ? WHERE id = ?")
        .bind(activo)
        .bind(disponible)
        .bind(EstadoDoctor::Ocupado.as_str())
        .bind(doctor_id)
        .execute(&mut *tx)
        .await?;

    registrar_historial(
        &mut tx,
        turno.id,
        "LLAMADO_A_CONSULTA",
        &format!("Doctor: {}", doctor_id),
        "doctor",
    )
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    tx.commit().await?;
    info!("turno {} llamado por el doctor {}", turno.numero, doctor_id);

    turno.estado = TurnoStatus::EnAtencion.as_str().to_string();
    turno.estacion_actual = Some(Estacion::Consulta.id());
    Ok(Some(turno))
}
