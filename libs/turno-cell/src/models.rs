use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row shape of the `turnos` table. `tipo` and `estado` stay in their stored
/// TEXT form here; the domain enums in shared-models interpret them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Turno {
    pub id: i64,
    pub numero: String,
    pub paciente_nombre: String,
    pub paciente_edad: Option<i64>,
    pub tipo: String,
    pub estado: String,
    pub estacion_actual: Option<i64>,
    pub estacion_siguiente: Option<i64>,
    pub doctor_asignado: Option<i64>,
    pub prioridad: i64,
    pub timestamp_creacion: NaiveDateTime,
    pub timestamp_atencion: Option<NaiveDateTime>,
    pub timestamp_cancelado: Option<NaiveDateTime>,
    pub razon_cancelacion: Option<String>,
    pub tiempo_total: Option<i64>,
    pub notas: String,
    pub estudios_solicitados: String,
    pub requiere_retorno: bool,
}

/// List view of a turno joined with display names for the reception board.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TurnoResumen {
    pub id: i64,
    pub numero: String,
    pub paciente_nombre: String,
    pub paciente_edad: Option<i64>,
    pub tipo: String,
    pub estado: String,
    pub estacion_actual: Option<i64>,
    pub estacion_actual_nombre: Option<String>,
    pub estacion_siguiente: Option<i64>,
    pub doctor_asignado: Option<i64>,
    pub doctor_nombre: Option<String>,
    pub prioridad: i64,
    pub timestamp_creacion: NaiveDateTime,
    pub timestamp_atencion: Option<NaiveDateTime>,
    pub requiere_retorno: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EstacionRow {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Medicion {
    pub id: i64,
    pub turno_id: i64,
    pub agudeza_visual_od: Option<String>,
    pub agudeza_visual_oi: Option<String>,
    pub presion_intraocular_od: Option<String>,
    pub presion_intraocular_oi: Option<String>,
    pub queratometria_od: Option<String>,
    pub queratometria_oi: Option<String>,
    pub refraccion_od: Option<String>,
    pub refraccion_oi: Option<String>,
    pub observaciones: Option<String>,
    pub atendido_por: Option<String>,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrearTurnoRequest {
    pub paciente_nombre: Option<String>,
    pub paciente_edad: Option<i64>,
    pub tipo: Option<String>,
    pub afiliacion: Option<String>,
    pub estacion_inicial: Option<i64>,
    pub doctor_asignado: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DerivarRequest {
    pub destino: String,
    #[serde(default)]
    pub vuelve_conmigo: bool,
    pub notas: Option<String>,
    pub usuario: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelarRequest {
    pub razon: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditarTurnoRequest {
    pub paciente_nombre: Option<String>,
    pub paciente_edad: Option<i64>,
    pub tipo: Option<String>,
    pub estacion_actual: Option<i64>,
    pub doctor_asignado: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolicitarEstudiosRequest {
    pub estudios: Vec<String>,
    pub usuario: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MedicionRequest {
    pub agudeza_visual_od: Option<String>,
    pub agudeza_visual_oi: Option<String>,
    pub presion_intraocular_od: Option<String>,
    pub presion_intraocular_oi: Option<String>,
    pub queratometria_od: Option<String>,
    pub queratometria_oi: Option<String>,
    pub refraccion_od: Option<String>,
    pub refraccion_oi: Option<String>,
    pub observaciones: Option<String>,
    pub atendido_por: Option<String>,
}

/// What intake reports back to reception.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeOutcome {
    pub turno_id: i64,
    pub numero: String,
    pub estado: String,
    pub estacion: i64,
    pub prioridad: i64,
    pub doctor_asignado: Option<i64>,
    pub doctor_nombre: Option<String>,
    pub mensaje: Option<String>,
}

/// Result of a derivation, including the synthesized return turno if one was
/// requested.
#[derive(Debug, Clone, Serialize)]
pub struct DerivacionOutcome {
    pub destino: String,
    pub estacion_destino: i64,
    pub estado: String,
    pub tiempo_total: Option<i64>,
    pub turno_retorno: Option<TurnoRetorno>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnoRetorno {
    pub id: i64,
    pub numero: String,
}
