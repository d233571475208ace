use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use shared_models::{AppError, EstadoDoctor};

use crate::models::Consultorio;

pub async fn listar_consultorios(pool: &SqlitePool) -> Result<Vec<Consultorio>, AppError> {
    let consultorios = sqlx::query_as::<_, Consultorio>(
        "SELECT c.id, c.numero, c.ocupado, c.doctor_actual, d.nombre AS doctor_nombre,
                c.timestamp_ocupado
         FROM consultorios c
         LEFT JOIN doctores d ON c.doctor_actual = d.id
         ORDER BY c.numero",
    )
    .fetch_all(pool)
    .await?;
    Ok(consultorios)
}

/// Starts a doctor's session in a consulting room. An occupied room rejects
/// the login with no mutation at all. A doctor holds at most one room: any
/// room the doctor already occupies is released before taking the new one.
pub async fn login(
    pool: &SqlitePool,
    doctor_id: i64,
    consultorio_id: i64,
    estado: EstadoDoctor,
) -> Result<String, AppError> {
    let mut tx = pool.begin().await?;

    let doctor_nombre: Option<String> = sqlx::query_scalar("SELECT nombre FROM doctores WHERE id = ?")
        .bind(doctor_id)
        .fetch_optional(&mut *tx)
        .await?;
    let doctor_nombre =
        doctor_nombre.ok_or_else(|| AppError::NotFound(format!("doctor {} no existe", doctor_id)))?;

    let consultorio: Option<(String, bool)> =
        sqlx::query_as("SELECT numero, ocupado FROM consultorios WHERE id = ?")
            .bind(consultorio_id)
            .fetch_optional(&mut *tx)
            .await?;
    let (numero, ocupado) = consultorio
        .ok_or_else(|| AppError::NotFound(format!("consultorio {} no existe", consultorio_id)))?;

    if ocupado {
        return Err(AppError::Business(format!("el {} ya está ocupado", numero)));
    }

    sqlx::query(
        "UPDATE consultorios
         SET ocupado = 0, doctor_actual = NULL, timestamp_ocupado = NULL
         WHERE doctor_actual = ?",
    )
    .bind(doctor_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE consultorios SET ocupado = 1, doctor_actual = ?, timestamp_ocupado = ? WHERE id = ?")
        .bind(doctor_id)
        .bind(Utc::now().naive_utc())
        .bind(consultorio_id)
        .execute(&mut *tx)
        .await?;

    let (activo, disponible) = estado.flags();
    sqlx::query("UPDATE doctores SET activo = ?, disponible = ?, estado_detallado = ? WHERE id = ?")
        .bind(activo)
        .bind(disponible)
        .bind(estado.as_str())
        .bind(doctor_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!("doctor {} inició sesión en {}", doctor_nombre, numero);
    Ok(doctor_nombre)
}

/// Ends the doctor's session. The doctor goes AUSENTE unconditionally, even
/// when no room was held.
pub async fn logout(pool: &SqlitePool, doctor_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let existe: Option<i64> = sqlx::query_scalar("SELECT id FROM doctores WHERE id = ?")
        .bind(doctor_id)
        .fetch_optional(&mut *tx)
        .await?;
    if existe.is_none() {
        return Err(AppError::NotFound(format!("doctor {} no existe", doctor_id)));
    }

    sqlx::query(
        "UPDATE consultorios
         SET ocupado = 0, doctor_actual = NULL, timestamp_ocupado = NULL
         WHERE doctor_actual = ?",
    )
    .bind(doctor_id)
    .execute(&mut *tx)
    .await?;

    let (activo, disponible) = EstadoDoctor::Ausente.flags();
    sqlx::query("UPDATE doctores SET activo = ?, disponible = ?, estado_detallado = ? WHERE id = ?")
        .bind(activo)
        .bind(disponible)
        .bind(EstadoDoctor::Ausente.as_str())
        .bind(doctor_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!("doctor {} cerró sesión", doctor_id);
    Ok(())
}

/// Applies the detailed-status triple mapping. Unrecognized values already
/// defaulted to DISPONIBLE at parse time.
pub async fn cambiar_estado(
    pool: &SqlitePool,
    doctor_id: i64,
    estado: EstadoDoctor,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let existe: Option<i64> = sqlx::query_scalar("SELECT id FROM doctores WHERE id = ?")
        .bind(doctor_id)
        .fetch_optional(&mut *tx)
        .await?;
    if existe.is_none() {
        return Err(AppError::NotFound(format!("doctor {} no existe", doctor_id)));
    }

    let (activo, disponible) = estado.flags();
    sqlx::query("UPDATE doctores SET activo = ?, disponible = ?, estado_detallado = ? WHERE id = ?")
        .bind(activo)
        .bind(disponible)
        .bind(estado.as_str())
        .bind(doctor_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
