use sqlx::SqlitePool;
use tracing::info;

use shared_models::AppError;

use crate::models::{CrearDoctorRequest, Doctor};

pub async fn listar_activos(pool: &SqlitePool) -> Result<Vec<Doctor>, AppError> {
    let doctores = sqlx::query_as::<_, Doctor>(
        "SELECT id, nombre, especialidad, activo, disponible, estado_detallado
         FROM doctores WHERE activo = 1 ORDER BY nombre",
    )
    .fetch_all(pool)
    .await?;
    Ok(doctores)
}

pub async fn listar_todos(pool: &SqlitePool) -> Result<Vec<Doctor>, AppError> {
    let doctores = sqlx::query_as::<_, Doctor>(
        "SELECT id, nombre, especialidad, activo, disponible, estado_detallado
         FROM doctores ORDER BY nombre",
    )
    .fetch_all(pool)
    .await?;
    Ok(doctores)
}

pub async fn crear(pool: &SqlitePool, req: CrearDoctorRequest) -> Result<i64, AppError> {
    let nombre = match req.nombre.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => return Err(AppError::Validation("nombre es obligatorio".to_string())),
    };

    let mut tx = pool.begin().await?;
    sqlx::query("INSERT INTO doctores (nombre, especialidad) VALUES (?, ?)")
        .bind(&nombre)
        .bind(&req.especialidad)
        .execute(&mut *tx)
        .await?;
    let id = shared_database::last_insert_id(&mut tx).await?;
    tx.commit().await?;

    info!("doctor {} creado ({})", nombre, id);
    Ok(id)
}

/// A doctor holding pending or in-consultation turnos cannot be removed; the
/// row stays untouched and the caller gets the refusal.
pub async fn eliminar(pool: &SqlitePool, doctor_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let existe: Option<i64> = sqlx::query_scalar("SELECT id FROM doctores WHERE id = ?")
        .bind(doctor_id)
        .fetch_optional(&mut *tx)
        .await?;
    if existe.is_none() {
        return Err(AppError::NotFound(format!("doctor {} no existe", doctor_id)));
    }

    let activos: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM turnos
         WHERE doctor_asignado = ? AND estado IN ('PENDIENTE', 'EN_ATENCION')",
    )
    .bind(doctor_id)
    .fetch_one(&mut *tx)
    .await?;

    if activos > 0 {
        return Err(AppError::Business(format!(
            "no se puede eliminar un doctor con {} turnos activos",
            activos
        )));
    }

    sqlx::query("DELETE FROM doctores WHERE id = ?")
        .bind(doctor_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!("doctor {} eliminado", doctor_id);
    Ok(())
}
