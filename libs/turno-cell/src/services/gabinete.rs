use sqlx::SqlitePool;
use tracing::info;

use shared_models::{AppError, Estacion, TurnoStatus};
use stats_cell::registrar_historial;

use crate::models::{Medicion, MedicionRequest, SolicitarEstudiosRequest};

use super::notas::append_nota;

async fn estado_de(pool_tx: &mut sqlx::SqliteConnection, turno_id: i64) -> Result<TurnoStatus, AppError> {
    let estado: Option<String> = sqlx::query_scalar("SELECT estado FROM turnos WHERE id = ?")
        .bind(turno_id)
        .fetch_optional(pool_tx)
        .await?;
    let estado = estado.ok_or_else(|| AppError::NotFound(format!("turno {} no existe", turno_id)))?;
    TurnoStatus::parse(&estado)
        .ok_or_else(|| AppError::Internal(format!("estado desconocido: {}", estado)))
}

/// Doctor requests gabinete studies: the patient goes back to reception to
/// pay, the ordered study list is recorded and the turno is flagged to return
/// to the same doctor afterwards.
pub async fn solicitar_estudios(
    pool: &SqlitePool,
    turno_id: i64,
    req: SolicitarEstudiosRequest,
) -> Result<(), AppError> {
    if req.estudios.is_empty() {
        return Err(AppError::Validation("se requiere al menos un estudio".to_string()));
    }
    let usuario = req.usuario.as_deref().unwrap_or("doctor");

    let mut tx = pool.begin().await?;

    let estado = estado_de(&mut tx, turno_id).await?;
    if estado.is_terminal() {
        return Err(AppError::Business(format!(
            "el turno {} ya está {}",
            turno_id,
            estado.as_str()
        )));
    }

    let estudios_json = serde_json::to_string(&req.estudios)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    sqlx::query(
        "UPDATE turnos
         SET estado = ?, estacion_actual = ?, estudios_solicitados = ?, requiere_retorno = 1
         WHERE id = ?",
    )
    .bind(TurnoStatus::PendientePagoEstudios.as_str())
    .bind(Estacion::Recepcion.id())
    .bind(&estudios_json)
    .bind(turno_id)
    .execute(&mut *tx)
    .await?;

    append_nota(
        &mut tx,
        turno_id,
        &format!("Estudios solicitados: {}", req.estudios.join(", ")),
    )
    .await?;

    registrar_historial(&mut tx, turno_id, "ENVIADO_A_GABINETE", &estudios_json, usuario)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tx.commit().await?;
    info!("turno {} enviado a gabinete", turno_id);
    Ok(())
}

/// Reception confirmed payment: the patient may proceed to measurements.
pub async fn confirmar_pago(pool: &SqlitePool, turno_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let estado = estado_de(&mut tx, turno_id).await?;
    if estado != TurnoStatus::PendientePagoEstudios {
        return Err(AppError::Business(format!(
            "el turno {} no espera pago de estudios (estado {})",
            turno_id,
            estado.as_str()
        )));
    }

    sqlx::query("UPDATE turnos SET estado = ?, estacion_actual = ? WHERE id = ?")
        .bind(TurnoStatus::EnEstudios.as_str())
        .bind(Estacion::TomaCalculos.id())
        .bind(turno_id)
        .execute(&mut *tx)
        .await?;

    registrar_historial(&mut tx, turno_id, "PAGO_CONFIRMADO", "", "recepcion")
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tx.commit().await?;
    Ok(())
}

/// Measurement session done: persist the record, summarize it into the note
/// log (always concatenating) and send the patient back to the consultation
/// queue.
pub async fn finalizar_mediciones(
    pool: &SqlitePool,
    turno_id: i64,
    req: MedicionRequest,
) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    let estado = estado_de(&mut tx, turno_id).await?;
    if estado != TurnoStatus::EnEstudios {
        return Err(AppError::Business(format!(
            "el turno {} no está en estudios (estado {})",
            turno_id,
            estado.as_str()
        )));
    }

    sqlx::query(
        "INSERT INTO mediciones_calculos
            (turno_id, agudeza_visual_od, agudeza_visual_oi,
             presion_intraocular_od, presion_intraocular_oi,
             queratometria_od, queratometria_oi,
             refraccion_od, refraccion_oi,
             observaciones, atendido_por)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(turno_id)
    .bind(&req.agudeza_visual_od)
    .bind(&req.agudeza_visual_oi)
    .bind(&req.presion_intraocular_od)
    .bind(&req.presion_intraocular_oi)
    .bind(&req.queratometria_od)
    .bind(&req.queratometria_oi)
    .bind(&req.refraccion_od)
    .bind(&req.refraccion_oi)
    .bind(&req.observaciones)
    .bind(&req.atendido_por)
    .execute(&mut *tx)
    .await?;
    let medicion_id = shared_database::last_insert_id(&mut tx).await?;

    sqlx::query("UPDATE turnos SET estado = ?, estacion_actual = ? WHERE id = ?")
        .bind(TurnoStatus::Pendiente.as_str())
        .bind(Estacion::Consulta.id())
        .bind(turno_id)
        .execute(&mut *tx)
        .await?;

    let operador = req.atendido_por.as_deref().unwrap_or("gabinete");
    let observaciones = req.observaciones.as_deref().unwrap_or("sin observaciones");
    append_nota(
        &mut tx,
        turno_id,
        &format!("Mediciones completadas por {}: {}", operador, observaciones),
    )
    .await?;

    registrar_historial(
        &mut tx,
        turno_id,
        "MEDICIONES_COMPLETADAS",
        &format!("Atendido por: {}", operador),
        operador,
    )
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    tx.commit().await?;
    info!("mediciones del turno {} registradas", turno_id);
    Ok(medicion_id)
}

/// Only the most recent measurement session is read back.
pub async fn ultima_medicion(pool: &SqlitePool, turno_id: i64) -> Result<Option<Medicion>, AppError> {
    let medicion = sqlx::query_as::<_, Medicion>(
        "SELECT * FROM mediciones_calculos
         WHERE turno_id = ?
         ORDER BY timestamp DESC, id DESC
         LIMIT 1",
    )
    .bind(turno_id)
    .fetch_optional(pool)
    .await?;
    Ok(medicion)
}
