use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use shared_models::{AppError, TurnoStatus};
use stats_cell::registrar_historial;

use crate::models::{CancelarRequest, EditarTurnoRequest, EstacionRow, Turno, TurnoResumen};

/// Reception board: every non-terminal turno, newest first, with display
/// names resolved.
pub async fn listar_activos(pool: &SqlitePool) -> Result<Vec<TurnoResumen>, AppError> {
    let turnos = sqlx::query_as::<_, TurnoResumen>(
        "SELECT t.id, t.numero, t.paciente_nombre, t.paciente_edad, t.tipo, t.estado,
                t.estacion_actual, e.nombre AS estacion_actual_nombre,
                t.estacion_siguiente, t.doctor_asignado, d.nombre AS doctor_nombre,
                t.prioridad, t.timestamp_creacion, t.timestamp_atencion, t.requiere_retorno
         FROM turnos t
         LEFT JOIN estaciones e ON t.estacion_actual = e.id
         LEFT JOIN doctores d ON t.doctor_asignado = d.id
         WHERE t.estado NOT IN ('FINALIZADO', 'CANCELADO')
         ORDER BY t.timestamp_creacion DESC, t.id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(turnos)
}

pub async fn obtener(pool: &SqlitePool, turno_id: i64) -> Result<Turno, AppError> {
    sqlx::query_as::<_, Turno>("SELECT * FROM turnos WHERE id = ?")
        .bind(turno_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("turno {} no existe", turno_id)))
}

pub async fn cancelar(
    pool: &SqlitePool,
    turno_id: i64,
    req: CancelarRequest,
) -> Result<(), AppError> {
    let razon = req
        .razon
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| "No especificada".to_string());

    let mut tx = pool.begin().await?;

    let estado: Option<String> = sqlx::query_scalar("SELECT estado FROM turnos WHERE id = ?")
        .bind(turno_id)
        .fetch_optional(&mut *tx)
        .await?;
    let estado = estado.ok_or_else(|| AppError::NotFound(format!("turno {} no existe", turno_id)))?;

    if matches!(TurnoStatus::parse(&estado), Some(s) if s.is_terminal()) {
        return Err(AppError::Business(format!(
            "el turno {} ya está {}",
            turno_id, estado
        )));
    }

    sqlx::query(
        "UPDATE turnos
         SET estado = ?, timestamp_cancelado = ?, razon_cancelacion = ?
         WHERE id = ?",
    )
    .bind(TurnoStatus::Cancelado.as_str())
    .bind(Utc::now().naive_utc())
    .bind(&razon)
    .bind(turno_id)
    .execute(&mut *tx)
    .await?;

    registrar_historial(&mut tx, turno_id, "CANCELADO", &format!("Razón: {}", razon), "recepcion")
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tx.commit().await?;
    info!("turno {} cancelado: {}", turno_id, razon);
    Ok(())
}

/// Reception-side correction of patient or routing fields. Only the provided
/// fields change.
pub async fn editar(
    pool: &SqlitePool,
    turno_id: i64,
    req: EditarTurnoRequest,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let actual: Turno = sqlx::query_as("SELECT * FROM turnos WHERE id = ?")
        .bind(turno_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("turno {} no existe", turno_id)))?;

    let nombre = req.paciente_nombre.unwrap_or(actual.paciente_nombre);
    let edad = req.paciente_edad.or(actual.paciente_edad);
    let tipo = req.tipo.unwrap_or(actual.tipo);
    let estacion = req.estacion_actual.or(actual.estacion_actual);
    let doctor = req.doctor_asignado.or(actual.doctor_asignado);

    sqlx::query(
        "UPDATE turnos
         SET paciente_nombre = ?, paciente_edad = ?, tipo = ?, estacion_actual = ?, doctor_asignado = ?
         WHERE id = ?",
    )
    .bind(&nombre)
    .bind(edad)
    .bind(&tipo)
    .bind(estacion)
    .bind(doctor)
    .bind(turno_id)
    .execute(&mut *tx)
    .await?;

    registrar_historial(&mut tx, turno_id, "EDITADO", "Datos actualizados por recepción", "recepcion")
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tx.commit().await?;
    Ok(())
}

/// Stations offered as derivation targets; reception and exit are not
/// selectable stops.
pub async fn estaciones_disponibles(pool: &SqlitePool) -> Result<Vec<EstacionRow>, AppError> {
    let estaciones = sqlx::query_as::<_, EstacionRow>(
        "SELECT id, nombre, descripcion FROM estaciones WHERE id NOT IN (1, 8) ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(estaciones)
}
