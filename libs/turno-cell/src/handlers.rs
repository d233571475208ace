use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::{AppError, AppState};

use crate::models::{
    CancelarRequest, CrearTurnoRequest, DerivarRequest, EditarTurnoRequest, MedicionRequest,
    SolicitarEstudiosRequest,
};
use crate::services::{assignment, derivation, gabinete, intake, turnos};

#[axum::debug_handler]
pub async fn get_turnos(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let turnos = turnos::listar_activos(&state.db).await?;
    Ok(Json(json!(turnos)))
}

#[axum::debug_handler]
pub async fn get_turno(
    State(state): State<Arc<AppState>>,
    Path(turno_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let turno = turnos::obtener(&state.db, turno_id).await?;
    Ok(Json(json!(turno)))
}

#[axum::debug_handler]
pub async fn crear_turno(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CrearTurnoRequest>,
) -> Result<Json<Value>, AppError> {
    let outcome = intake::crear_turno(&state.db, req).await?;
    Ok(Json(json!({
        "success": true,
        "turno_id": outcome.turno_id,
        "numero_turno": outcome.numero,
        "estado": outcome.estado,
        "estacion": outcome.estacion,
        "prioridad": outcome.prioridad,
        "doctor_asignado": outcome.doctor_asignado,
        "doctor_nombre": outcome.doctor_nombre,
        "mensaje": outcome.mensaje,
    })))
}

#[axum::debug_handler]
pub async fn cancelar_turno(
    State(state): State<Arc<AppState>>,
    Path(turno_id): Path<i64>,
    req: Option<Json<CancelarRequest>>,
) -> Result<Json<Value>, AppError> {
    let req = req.map(|Json(r)| r).unwrap_or(CancelarRequest { razon: None });
    turnos::cancelar(&state.db, turno_id, req).await?;
    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn editar_turno(
    State(state): State<Arc<AppState>>,
    Path(turno_id): Path<i64>,
    Json(req): Json<EditarTurnoRequest>,
) -> Result<Json<Value>, AppError> {
    turnos::editar(&state.db, turno_id, req).await?;
    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn derivar_turno(
    State(state): State<Arc<AppState>>,
    Path(turno_id): Path<i64>,
    Json(req): Json<DerivarRequest>,
) -> Result<Json<Value>, AppError> {
    let outcome = derivation::derivar_paciente(&state.db, turno_id, req).await?;
    Ok(Json(json!({
        "success": true,
        "destino": outcome.destino,
        "estacion_destino": outcome.estacion_destino,
        "estado": outcome.estado,
        "tiempo_total": outcome.tiempo_total,
        "turno_retorno": outcome.turno_retorno,
    })))
}

#[axum::debug_handler]
pub async fn completar_afiliacion(
    State(state): State<Arc<AppState>>,
    Path(turno_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    match assignment::completar_afiliacion(&state.db, turno_id).await? {
        Some(asignacion) => Ok(Json(json!({
            "success": true,
            "asignado": true,
            "doctor_id": asignacion.doctor_id,
            "doctor_nombre": asignacion.doctor_nombre,
            "posicion": asignacion.posicion,
        }))),
        None => Ok(Json(json!({
            "success": true,
            "asignado": false,
            "mensaje": "Sin doctores disponibles; el turno queda en lista de espera",
        }))),
    }
}

#[axum::debug_handler]
pub async fn solicitar_estudios(
    State(state): State<Arc<AppState>>,
    Path(turno_id): Path<i64>,
    Json(req): Json<SolicitarEstudiosRequest>,
) -> Result<Json<Value>, AppError> {
    gabinete::solicitar_estudios(&state.db, turno_id, req).await?;
    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn confirmar_pago_estudios(
    State(state): State<Arc<AppState>>,
    Path(turno_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    gabinete::confirmar_pago(&state.db, turno_id).await?;
    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn registrar_mediciones(
    State(state): State<Arc<AppState>>,
    Path(turno_id): Path<i64>,
    Json(req): Json<MedicionRequest>,
) -> Result<Json<Value>, AppError> {
    let medicion_id = gabinete::finalizar_mediciones(&state.db, turno_id, req).await?;
    Ok(Json(json!({ "success": true, "medicion_id": medicion_id })))
}

#[axum::debug_handler]
pub async fn get_ultima_medicion(
    State(state): State<Arc<AppState>>,
    Path(turno_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let medicion = gabinete::ultima_medicion(&state.db, turno_id).await?;
    match medicion {
        Some(m) => Ok(Json(json!(m))),
        None => Err(AppError::NotFound(format!(
            "el turno {} no tiene mediciones registradas",
            turno_id
        ))),
    }
}

#[axum::debug_handler]
pub async fn get_estaciones(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let estaciones = turnos::estaciones_disponibles(&state.db).await?;
    Ok(Json(json!(estaciones)))
}
