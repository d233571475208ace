use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::{AppError, AppState};

use crate::services::{history, stats};

#[axum::debug_handler]
pub async fn get_estadisticas_dia(State(state): State<Arc<AppState>>) -> Json<Value> {
    let stats = stats::estadisticas_dia(&state.db, None).await;
    Json(json!(stats))
}

#[axum::debug_handler]
pub async fn get_estadisticas_dia_fecha(
    State(state): State<Arc<AppState>>,
    Path(fecha): Path<String>,
) -> Json<Value> {
    let stats = stats::estadisticas_dia(&state.db, Some(fecha)).await;
    Json(json!(stats))
}

#[axum::debug_handler]
pub async fn get_estadisticas_mes(State(state): State<Arc<AppState>>) -> Json<Value> {
    let stats = stats::estadisticas_mes(&state.db, None, None).await;
    Json(json!(stats))
}

#[axum::debug_handler]
pub async fn get_estadisticas_mes_fecha(
    State(state): State<Arc<AppState>>,
    Path((mes, anio)): Path<(u32, i32)>,
) -> Json<Value> {
    let stats = stats::estadisticas_mes(&state.db, Some(mes), Some(anio)).await;
    Json(json!(stats))
}

#[axum::debug_handler]
pub async fn get_historial_turno(
    State(state): State<Arc<AppState>>,
    Path(turno_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let entries = history::historial_de_turno(&state.db, turno_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!(entries)))
}
