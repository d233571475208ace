use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::{AppError, AppState};

use crate::models::{CrearNotificacionRequest, ListarQuery};

/// A doctor pushes a message to reception. The doctor's display name comes
/// from the database; the message itself never touches durable state.
#[axum::debug_handler]
pub async fn crear_notificacion(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CrearNotificacionRequest>,
) -> Result<Json<Value>, AppError> {
    let mensaje = match req.mensaje.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => return Err(AppError::Validation("mensaje es obligatorio".to_string())),
    };

    let doctor_nombre: Option<String> = sqlx::query_scalar("SELECT nombre FROM doctores WHERE id = ?")
        .bind(req.doctor_id)
        .fetch_optional(&state.db)
        .await?;
    let doctor_nombre = doctor_nombre
        .ok_or_else(|| AppError::NotFound(format!("doctor {} no existe", req.doctor_id)))?;

    let notificacion = state
        .mailbox
        .publish(
            req.doctor_id,
            doctor_nombre,
            req.consultorio,
            mensaje,
            req.tipo.unwrap_or_else(|| "AVISO".to_string()),
        )
        .await;

    debug!("notificación {} publicada", notificacion.id);
    Ok(Json(json!({ "success": true, "notificacion": notificacion })))
}

#[axum::debug_handler]
pub async fn get_notificaciones(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListarQuery>,
) -> Json<Value> {
    let notificaciones = state.mailbox.list(query.no_leidas).await;
    let no_leidas = state.mailbox.unread_count().await;
    Json(json!({
        "notificaciones": notificaciones,
        "no_leidas": no_leidas,
    }))
}

#[axum::debug_handler]
pub async fn marcar_leida(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if state.mailbox.mark_read(id).await {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(AppError::NotFound(format!("notificación {} no existe", id)))
    }
}

#[axum::debug_handler]
pub async fn marcar_todas_leidas(State(state): State<Arc<AppState>>) -> Json<Value> {
    let marcadas = state.mailbox.mark_all_read().await;
    Json(json!({ "success": true, "marcadas": marcadas }))
}
