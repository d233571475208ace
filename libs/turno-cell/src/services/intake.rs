use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use shared_models::{prioridad, Afiliacion, AppError, Estacion, TurnoStatus, TurnoTipo};
use stats_cell::registrar_historial;

use crate::models::{CrearTurnoRequest, IntakeOutcome};

use super::assignment::asignar_a_lista_espera;
use super::notas::append_nota;
use super::numbering::siguiente_numero;

/// Where a fresh turno starts, per the intake decision table.
#[derive(Debug, Clone)]
pub struct Clasificacion {
    pub tipo: TurnoTipo,
    pub prioridad: i64,
    pub prefijo: &'static str,
    pub estacion_inicial: i64,
    pub estado_inicial: TurnoStatus,
}

pub fn clasificar(
    tipo: TurnoTipo,
    afiliacion: Option<Afiliacion>,
    estacion_solicitada: Option<i64>,
) -> Clasificacion {
    match (tipo, afiliacion) {
        (TurnoTipo::SinCita, Some(Afiliacion::YaAfiliado)) => Clasificacion {
            tipo,
            prioridad: prioridad::SIN_CITA_AFILIADO,
            prefijo: "AF",
            estacion_inicial: Estacion::Consulta.id(),
            estado_inicial: TurnoStatus::EsperandoAsignacion,
        },
        (TurnoTipo::SinCita, _) => Clasificacion {
            tipo,
            prioridad: prioridad::SIN_CITA_NO_AFILIADO,
            prefijo: "SC",
            estacion_inicial: Estacion::TrabajoSocial.id(),
            estado_inicial: TurnoStatus::Pendiente,
        },
        _ => Clasificacion {
            tipo: TurnoTipo::Cita,
            prioridad: prioridad::CITA,
            prefijo: "A",
            estacion_inicial: estacion_solicitada.unwrap_or(Estacion::Recepcion.id()),
            estado_inicial: TurnoStatus::Pendiente,
        },
    }
}

/// Validates the intake request, classifies the patient, assigns the display
/// number and writes the turno. Walk-ins already affiliated immediately try
/// the doctor waiting list.
pub async fn crear_turno(
    pool: &SqlitePool,
    req: CrearTurnoRequest,
) -> Result<IntakeOutcome, AppError> {
    let nombre = match req.paciente_nombre.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => return Err(AppError::Validation("paciente_nombre es obligatorio".to_string())),
    };
    let edad = req
        .paciente_edad
        .ok_or_else(|| AppError::Validation("paciente_edad es obligatoria".to_string()))?;
    let tipo = match req.tipo.as_deref() {
        Some("CITA") => TurnoTipo::Cita,
        Some("SIN_CITA") => TurnoTipo::SinCita,
        Some(otro) => {
            return Err(AppError::Validation(format!("tipo de turno inválido: {}", otro)))
        }
        None => return Err(AppError::Validation("tipo es obligatorio".to_string())),
    };
    let afiliacion = match req.afiliacion.as_deref() {
        Some("YA_AFILIADO") => Some(Afiliacion::YaAfiliado),
        Some("NO_AFILIADO") => Some(Afiliacion::NoAfiliado),
        _ => None,
    };

    let clasificacion = clasificar(tipo, afiliacion, req.estacion_inicial);

    // A caller-picked doctor only makes sense when the patient starts at the
    // consultation station.
    let doctor_inicial = if clasificacion.estacion_inicial == Estacion::Consulta.id()
        && tipo == TurnoTipo::Cita
    {
        req.doctor_asignado
    } else {
        None
    };

    let mut tx = pool.begin().await?;

    let numero = siguiente_numero(&mut tx, clasificacion.prefijo, Utc::now().date_naive()).await?;

    sqlx::query(
        "INSERT INTO turnos
            (numero, paciente_nombre, paciente_edad, tipo, estado,
             estacion_actual, doctor_asignado, prioridad)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&numero)
    .bind(&nombre)
    .bind(edad)
    .bind(clasificacion.tipo.as_str())
    .bind(clasificacion.estado_inicial.as_str())
    .bind(clasificacion.estacion_inicial)
    .bind(doctor_inicial)
    .bind(clasificacion.prioridad)
    .execute(&mut *tx)
    .await?;

    let turno_id = shared_database::last_insert_id(&mut tx).await?;

    append_nota(
        &mut tx,
        turno_id,
        &format!(
            "Ingreso {}: prioridad {}, estación inicial {}",
            clasificacion.tipo.as_str(),
            clasificacion.prioridad,
            clasificacion.estacion_inicial
        ),
    )
    .await?;

    registrar_historial(
        &mut tx,
        turno_id,
        "CREADO",
        &format!(
            "Tipo: {}, estación: {}, prioridad: {}",
            clasificacion.tipo.as_str(),
            clasificacion.estacion_inicial,
            clasificacion.prioridad
        ),
        "recepcion",
    )
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut estado = clasificacion.estado_inicial;
    let mut doctor_asignado = doctor_inicial;
    let mut doctor_nombre = None;
    let mut mensaje = None;

    if tipo == TurnoTipo::SinCita && afiliacion == Some(Afiliacion::YaAfiliado) {
        match asignar_a_lista_espera(&mut tx, turno_id).await? {
            Some(asignacion) => {
                estado = TurnoStatus::Pendiente;
                doctor_asignado = Some(asignacion.doctor_id);
                doctor_nombre = Some(asignacion.doctor_nombre);
            }
            None => {
                mensaje = Some("Sin doctores disponibles; el turno queda en lista de espera".to_string());
            }
        }
    }

    tx.commit().await?;
    info!("turno {} creado ({})", numero, turno_id);

    Ok(IntakeOutcome {
        turno_id,
        numero,
        estado: estado.as_str().to_string(),
        estacion: clasificacion.estacion_inicial,
        prioridad: clasificacion.prioridad,
        doctor_asignado,
        doctor_nombre,
        mensaje,
    })
}
