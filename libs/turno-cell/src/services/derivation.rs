use chrono::{NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::info;

use shared_models::{prioridad, AppError, DestinoDerivacion, Estacion, EstadoDoctor, TurnoStatus, TurnoTipo};
use stats_cell::registrar_historial;

use crate::models::{DerivacionOutcome, DerivarRequest, TurnoRetorno};

use super::notas::append_nota;

#[derive(Debug, FromRow)]
struct TurnoParaDerivar {
    numero: String,
    paciente_nombre: String,
    paciente_edad: Option<i64>,
    estado: String,
    doctor_asignado: Option<i64>,
    timestamp_atencion: Option<NaiveDateTime>,
}

/// Doctor-initiated station routing. SALIDA finalizes the turno and stamps
/// the total minutes; any other destination parks it EN_PROCESO at the target
/// station, optionally scheduling a return to the same doctor via a fresh
/// 'R'-numbered turno.
pub async fn derivar_paciente(
    pool: &SqlitePool,
    turno_id: i64,
    req: DerivarRequest,
) -> Result<DerivacionOutcome, AppError> {
    let destino = DestinoDerivacion::parse_or_salida(&req.destino);
    let usuario = req.usuario.as_deref().unwrap_or("doctor");

    let mut tx = pool.begin().await?;

    let turno: TurnoParaDerivar = sqlx::query_as(
        "SELECT numero, paciente_nombre, paciente_edad, estado, doctor_asignado, timestamp_atencion
         FROM turnos WHERE id = ?",
    )
    .bind(turno_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("turno {} no existe", turno_id)))?;

    if matches!(TurnoStatus::parse(&turno.estado), Some(s) if s.is_terminal()) {
        return Err(AppError::Business(format!(
            "el turno {} ya está {}",
            turno.numero, turno.estado
        )));
    }

    let estacion_destino = destino.estacion().id();
    let (estado_final, tiempo_total) = if destino == DestinoDerivacion::Salida {
        let minutos = turno
            .timestamp_atencion
            .map(|atencion| (Utc::now().naive_utc() - atencion).num_minutes().max(0))
            .unwrap_or(0);
        (TurnoStatus::Finalizado, Some(minutos))
    } else {
        (TurnoStatus::EnProceso, None)
    };

    let vuelve = req.vuelve_conmigo && destino != DestinoDerivacion::Salida;
    let estacion_siguiente = if vuelve { Some(Estacion::Consulta.id()) } else { None };

    sqlx::query(
        "UPDATE turnos
         SET estado = ?, estacion_actual = ?, estacion_siguiente = ?, tiempo_total = ?
         WHERE id = ?",
    )
    .bind(estado_final.as_str())
    .bind(estacion_destino)
    .bind(estacion_siguiente)
    .bind(tiempo_total)
    .bind(turno_id)
    .execute(&mut *tx)
    .await?;

    if let Some(notas) = req.notas.as_deref().filter(|n| !n.trim().is_empty()) {
        append_nota(&mut tx, turno_id, notas).await?;
    }

    // Synthesize the return visit: an independent turno tied to the original
    // only by its 'R'-prefixed number and shared patient fields.
    let mut turno_retorno = None;
    if vuelve {
        let numero_retorno = format!("R{}", turno.numero);
        sqlx::query(
            "INSERT INTO turnos
                (numero, paciente_nombre, paciente_edad, tipo, estado,
                 estacion_actual, doctor_asignado, prioridad)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&numero_retorno)
        .bind(&turno.paciente_nombre)
        .bind(turno.paciente_edad)
        .bind(TurnoTipo::RetornoConsulta.as_str())
        .bind(TurnoStatus::Pendiente.as_str())
        .bind(Estacion::Consulta.id())
        .bind(turno.doctor_asignado)
        .bind(prioridad::RETORNO)
        .execute(&mut *tx)
        .await?;
        let retorno_id = shared_database::last_insert_id(&mut tx).await?;

        registrar_historial(
            &mut tx,
            retorno_id,
            "CREADO",
            &format!("Retorno a consulta del turno {}", turno.numero),
            usuario,
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

        turno_retorno = Some(TurnoRetorno {
            id: retorno_id,
            numero: numero_retorno,
        });
    }

    // Consultation ended: the deriving doctor takes the next patient.
    if let Some(doctor_id) = turno.doctor_asignado {
        sqlx::query("UPDATE doctores SET disponible = 1, estado_detallado = ? WHERE id = ? AND activo = 1")
            .bind(EstadoDoctor::Disponible.as_str())
            .bind(doctor_id)
            .execute(&mut *tx)
            .await?;
    }

    registrar_historial(
        &mut tx,
        turno_id,
        &format!("DERIVADO_A_{}", destino.as_str()),
        &format!("Vuelve: {}, notas: {}", vuelve, req.notas.as_deref().unwrap_or("")),
        usuario,
    )
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    tx.commit().await?;
    info!("turno {} derivado a {}", turno.numero, destino.as_str());

    Ok(DerivacionOutcome {
        destino: destino.as_str().to_string(),
        estacion_destino,
        estado: estado_final.as_str().to_string(),
        tiempo_total,
        turno_retorno,
    })
}
