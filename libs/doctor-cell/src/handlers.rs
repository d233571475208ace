use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::{AppError, AppState, EstadoDoctor};

use crate::models::{
    CambiarEstadoRequest, CrearDoctorRequest, LlamarSiguienteRequest, LoginRequest, LogoutRequest,
};
use crate::services::{doctor, queue, session};

#[derive(Debug, Deserialize)]
pub struct DoctorQuery {
    pub doctor_id: i64,
}

#[axum::debug_handler]
pub async fn get_doctores(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let doctores = doctor::listar_activos(&state.db).await?;
    Ok(Json(json!(doctores)))
}

#[axum::debug_handler]
pub async fn get_todos_doctores(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let doctores = doctor::listar_todos(&state.db).await?;
    Ok(Json(json!(doctores)))
}

#[axum::debug_handler]
pub async fn crear_doctor(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CrearDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = doctor::crear(&state.db, req).await?;
    Ok(Json(json!({ "success": true, "doctor_id": doctor_id })))
}

#[axum::debug_handler]
pub async fn eliminar_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    doctor::eliminar(&state.db, doctor_id).await?;
    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let estado = EstadoDoctor::parse_or_default(req.estado.as_deref().unwrap_or("DISPONIBLE"));
    let doctor_nombre = session::login(&state.db, req.doctor_id, req.consultorio_id, estado).await?;
    Ok(Json(json!({
        "success": true,
        "doctor_nombre": doctor_nombre,
        "message": "Sesión iniciada correctamente",
    })))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<Value>, AppError> {
    session::logout(&state.db, req.doctor_id).await?;
    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn cambiar_estado(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CambiarEstadoRequest>,
) -> Result<Json<Value>, AppError> {
    let estado = EstadoDoctor::parse_or_default(req.estado.as_deref().unwrap_or(""));
    session::cambiar_estado(&state.db, req.doctor_id, estado).await?;
    Ok(Json(json!({ "success": true, "estado": estado.as_str() })))
}

#[axum::debug_handler]
pub async fn get_turnos_doctor(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DoctorQuery>,
) -> Result<Json<Value>, AppError> {
    let turnos = queue::turnos_pendientes(&state.db, query.doctor_id).await?;
    Ok(Json(json!(turnos)))
}

#[axum::debug_handler]
pub async fn llamar_siguiente(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LlamarSiguienteRequest>,
) -> Result<Json<Value>, AppError> {
    match queue::llamar_siguiente(&state.db, req.doctor_id).await? {
        Some(turno) => Ok(Json(json!({ "success": true, "turno": turno }))),
        None => Ok(Json(json!({
            "success": false,
            "error": "No hay pacientes en espera",
        }))),
    }
}

#[axum::debug_handler]
pub async fn get_consultorios(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let consultorios = session::listar_consultorios(&state.db).await?;
    Ok(Json(json!(consultorios)))
}
