use rand::seq::SliceRandom;
use rand::thread_rng;
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use shared_models::{AppError, Estacion, TurnoStatus};
use stats_cell::registrar_historial;

use super::notas::append_nota;

#[derive(Debug, Clone, FromRow)]
struct Candidato {
    id: i64,
    nombre: String,
    carga: i64,
}

/// Outcome of a successful waiting-list assignment.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Asignacion {
    pub doctor_id: i64,
    pub doctor_nombre: String,
    pub posicion: i64,
}

/// Picks the least-loaded active+available doctor (random tie-break, up to 3
/// candidates considered) and hands the turno to them. `Ok(None)` means no
/// doctor was available: the turno stays ESPERANDO_ASIGNACION, which is a
/// valid waiting state, not an error.
pub async fn asignar_a_lista_espera(
    conn: &mut SqliteConnection,
    turno_id: i64,
) -> Result<Option<Asignacion>, AppError> {
    let mut candidatos: Vec<Candidato> = sqlx::query_as(
        "SELECT d.id, d.nombre,
                (SELECT COUNT(*) FROM turnos t
                 WHERE t.doctor_asignado = d.id
                   AND t.estado IN ('PENDIENTE', 'EN_ATENCION')) AS carga
         FROM doctores d
         WHERE d.activo = 1 AND d.disponible = 1",
    )
    .fetch_all(&mut *conn)
    .await?;

    if candidatos.is_empty() {
        debug!("sin doctores disponibles para el turno {}", turno_id);
        return Ok(None);
    }

    // Shuffle first so equal loads resolve randomly, then keep the sort
    // stable by load.
    candidatos.shuffle(&mut thread_rng());
    candidatos.sort_by_key(|c| c.carga);
    candidatos.truncate(3);
    let elegido = candidatos.remove(0);
    let posicion = elegido.carga + 1;

    sqlx::query("UPDATE turnos SET doctor_asignado = ?, estacion_actual = ?, estado = ? WHERE id = ?")
        .bind(elegido.id)
        .bind(Estacion::Consulta.id())
        .bind(TurnoStatus::Pendiente.as_str())
        .bind(turno_id)
        .execute(&mut *conn)
        .await?;

    append_nota(
        &mut *conn,
        turno_id,
        &format!(
            "Asignado automáticamente a {} (posición {} en cola)",
            elegido.nombre, posicion
        ),
    )
    .await?;

    registrar_historial(
        &mut *conn,
        turno_id,
        "ASIGNADO_DOCTOR",
        &format!("Doctor: {}, posición: {}", elegido.nombre, posicion),
        "sistema",
    )
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(
        "turno {} asignado al doctor {} (carga {})",
        turno_id, elegido.id, elegido.carga
    );

    Ok(Some(Asignacion {
        doctor_id: elegido.id,
        doctor_nombre: elegido.nombre,
        posicion,
    }))
}

/// Social work finished affiliating the patient: record it and try to hand
/// the turno to a doctor. Without one it parks at the consultation station in
/// ESPERANDO_ASIGNACION.
pub async fn completar_afiliacion(
    pool: &SqlitePool,
    turno_id: i64,
) -> Result<Option<Asignacion>, AppError> {
    let mut tx = pool.begin().await?;

    let estado: Option<String> = sqlx::query_scalar("SELECT estado FROM turnos WHERE id = ?")
        .bind(turno_id)
        .fetch_optional(&mut *tx)
        .await?;
    let estado = estado.ok_or_else(|| AppError::NotFound(format!("turno {} no existe", turno_id)))?;

    match TurnoStatus::parse(&estado) {
        Some(s) if s.is_terminal() => {
            return Err(AppError::Business(format!(
                "el turno {} ya está {}",
                turno_id, estado
            )));
        }
        _ => {}
    }

    registrar_historial(
        &mut tx,
        turno_id,
        "AFILIACION_COMPLETADA",
        "Trabajo social completó la afiliación",
        "trabajo_social",
    )
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    let asignacion = asignar_a_lista_espera(&mut tx, turno_id).await?;

    if asignacion.is_none() {
        sqlx::query("UPDATE turnos SET estado = ?, estacion_actual = ?, doctor_asignado = NULL WHERE id = ?")
            .bind(TurnoStatus::EsperandoAsignacion.as_str())
            .bind(Estacion::Consulta.id())
            .bind(turno_id)
            .execute(&mut *tx)
            .await?;
        append_nota(
            &mut tx,
            turno_id,
            "Afiliación completada; en espera de doctor disponible",
        )
        .await?;
    }

    tx.commit().await?;
    Ok(asignacion)
}
