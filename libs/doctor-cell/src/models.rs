use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Doctor {
    pub id: i64,
    pub nombre: String,
    pub especialidad: Option<String>,
    pub activo: bool,
    pub disponible: bool,
    pub estado_detallado: String,
}

/// Consulting room with its current occupant resolved for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Consultorio {
    pub id: i64,
    pub numero: String,
    pub ocupado: bool,
    pub doctor_actual: Option<i64>,
    pub doctor_nombre: Option<String>,
    pub timestamp_ocupado: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrearDoctorRequest {
    pub nombre: Option<String>,
    pub especialidad: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub doctor_id: i64,
    pub consultorio_id: i64,
    pub estado: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogoutRequest {
    pub doctor_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CambiarEstadoRequest {
    pub doctor_id: i64,
    pub estado: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlamarSiguienteRequest {
    pub doctor_id: i64,
}

/// Turno as the doctor sees it in their queue.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TurnoEnCola {
    pub id: i64,
    pub numero: String,
    pub paciente_nombre: String,
    pub paciente_edad: Option<i64>,
    pub tipo: String,
    pub estado: String,
    pub estacion_actual: Option<i64>,
    pub estacion_actual_nombre: Option<String>,
    pub prioridad: i64,
    pub timestamp_creacion: NaiveDateTime,
    pub notas: String,
}
