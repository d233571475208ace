use serde::{Deserialize, Serialize};

/// Physical stops of the clinic workflow. Ids match the seeded `estaciones`
/// rows and are stable: the frontend and the turnos table both reference them
/// by number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estacion {
    Recepcion = 1,
    TrabajoSocial = 2,
    TomaCalculos = 3,
    Consulta = 4,
    Farmacia = 5,
    AsesoriaVisual = 6,
    EstudiosEspeciales = 7,
    Salida = 8,
}

impl Estacion {
    pub fn id(self) -> i64 {
        self as i64
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Estacion::Recepcion),
            2 => Some(Estacion::TrabajoSocial),
            3 => Some(Estacion::TomaCalculos),
            4 => Some(Estacion::Consulta),
            5 => Some(Estacion::Farmacia),
            6 => Some(Estacion::AsesoriaVisual),
            7 => Some(Estacion::EstudiosEspeciales),
            8 => Some(Estacion::Salida),
            _ => None,
        }
    }

    pub fn nombre(self) -> &'static str {
        match self {
            Estacion::Recepcion => "Recepción",
            Estacion::TrabajoSocial => "Trabajo Social",
            Estacion::TomaCalculos => "Toma de Cálculos Correspondientes",
            Estacion::Consulta => "Consulta Médica",
            Estacion::Farmacia => "Farmacia",
            Estacion::AsesoriaVisual => "Asesoría Visual",
            Estacion::EstudiosEspeciales => "Estudios Especiales",
            Estacion::Salida => "Salida",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnoStatus {
    Pendiente,
    EnAtencion,
    EnProceso,
    Finalizado,
    Cancelado,
    PendientePagoEstudios,
    EnEstudios,
    EsperandoAsignacion,
}

impl TurnoStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TurnoStatus::Pendiente => "PENDIENTE",
            TurnoStatus::EnAtencion => "EN_ATENCION",
            TurnoStatus::EnProceso => "EN_PROCESO",
            TurnoStatus::Finalizado => "FINALIZADO",
            TurnoStatus::Cancelado => "CANCELADO",
            TurnoStatus::PendientePagoEstudios => "PENDIENTE_PAGO_ESTUDIOS",
            TurnoStatus::EnEstudios => "EN_ESTUDIOS",
            TurnoStatus::EsperandoAsignacion => "ESPERANDO_ASIGNACION",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDIENTE" => Some(TurnoStatus::Pendiente),
            "EN_ATENCION" => Some(TurnoStatus::EnAtencion),
            "EN_PROCESO" => Some(TurnoStatus::EnProceso),
            "FINALIZADO" => Some(TurnoStatus::Finalizado),
            "CANCELADO" => Some(TurnoStatus::Cancelado),
            "PENDIENTE_PAGO_ESTUDIOS" => Some(TurnoStatus::PendientePagoEstudios),
            "EN_ESTUDIOS" => Some(TurnoStatus::EnEstudios),
            "ESPERANDO_ASIGNACION" => Some(TurnoStatus::EsperandoAsignacion),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TurnoStatus::Finalizado | TurnoStatus::Cancelado)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnoTipo {
    Cita,
    SinCita,
    RetornoConsulta,
}

impl TurnoTipo {
    pub fn as_str(self) -> &'static str {
        match self {
            TurnoTipo::Cita => "CITA",
            TurnoTipo::SinCita => "SIN_CITA",
            TurnoTipo::RetornoConsulta => "RETORNO_CONSULTA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Afiliacion {
    YaAfiliado,
    NoAfiliado,
}

/// Detailed doctor presence, plus its fixed projection onto the
/// (activo, disponible) pair stored in `doctores`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoDoctor {
    Disponible,
    Ocupado,
    Ausente,
}

impl EstadoDoctor {
    pub fn as_str(self) -> &'static str {
        match self {
            EstadoDoctor::Disponible => "DISPONIBLE",
            EstadoDoctor::Ocupado => "OCUPADO",
            EstadoDoctor::Ausente => "AUSENTE",
        }
    }

    /// Unrecognized values fall back to DISPONIBLE.
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "OCUPADO" => EstadoDoctor::Ocupado,
            "AUSENTE" => EstadoDoctor::Ausente,
            _ => EstadoDoctor::Disponible,
        }
    }

    /// (activo, disponible) flags implied by the detailed state.
    pub fn flags(self) -> (bool, bool) {
        match self {
            EstadoDoctor::Disponible => (true, true),
            EstadoDoctor::Ocupado => (true, false),
            EstadoDoctor::Ausente => (false, false),
        }
    }
}

/// Destination tags a doctor can derive a patient to. Unknown tags fall back
/// to the exit station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DestinoDerivacion {
    TomaCalculos,
    TrabajoSocial,
    Farmacia,
    AsesoriaVisual,
    EstudiosEspeciales,
    Salida,
}

impl DestinoDerivacion {
    pub fn as_str(self) -> &'static str {
        match self {
            DestinoDerivacion::TomaCalculos => "TOMA_CALCULOS",
            DestinoDerivacion::TrabajoSocial => "TRABAJO_SOCIAL",
            DestinoDerivacion::Farmacia => "FARMACIA",
            DestinoDerivacion::AsesoriaVisual => "ASESORIA_VISUAL",
            DestinoDerivacion::EstudiosEspeciales => "ESTUDIOS_ESPECIALES",
            DestinoDerivacion::Salida => "SALIDA",
        }
    }

    pub fn parse_or_salida(value: &str) -> Self {
        match value {
            "TOMA_CALCULOS" => DestinoDerivacion::TomaCalculos,
            "TRABAJO_SOCIAL" => DestinoDerivacion::TrabajoSocial,
            "FARMACIA" => DestinoDerivacion::Farmacia,
            "ASESORIA_VISUAL" => DestinoDerivacion::AsesoriaVisual,
            "ESTUDIOS_ESPECIALES" => DestinoDerivacion::EstudiosEspeciales,
            _ => DestinoDerivacion::Salida,
        }
    }

    pub fn estacion(self) -> Estacion {
        match self {
            DestinoDerivacion::TomaCalculos => Estacion::TomaCalculos,
            DestinoDerivacion::TrabajoSocial => Estacion::TrabajoSocial,
            DestinoDerivacion::Farmacia => Estacion::Farmacia,
            DestinoDerivacion::AsesoriaVisual => Estacion::AsesoriaVisual,
            DestinoDerivacion::EstudiosEspeciales => Estacion::EstudiosEspeciales,
            DestinoDerivacion::Salida => Estacion::Salida,
        }
    }
}

/// Priorities assigned at intake; higher is served sooner.
pub mod prioridad {
    pub const CITA: i64 = 3;
    pub const RETORNO: i64 = 2;
    pub const SIN_CITA_AFILIADO: i64 = 2;
    pub const SIN_CITA_NO_AFILIADO: i64 = 1;
}
