use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Immutable audit row. Appended on every state change, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistorialEntry {
    pub id: i64,
    pub turno_id: i64,
    pub accion: String,
    pub detalles: Option<String>,
    pub timestamp: NaiveDateTime,
    pub usuario: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CancelacionPorRazon {
    pub razon_cancelacion: Option<String>,
    pub cantidad: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstadisticasDia {
    pub fecha: String,
    pub total_turnos: i64,
    pub cancelados: i64,
    pub finalizados: i64,
    pub activos: i64,
    pub tasa_cancelacion: f64,
    pub cancelaciones_por_razon: Vec<CancelacionPorRazon>,
}

impl EstadisticasDia {
    pub fn vacio(fecha: String) -> Self {
        Self {
            fecha,
            total_turnos: 0,
            cancelados: 0,
            finalizados: 0,
            activos: 0,
            tasa_cancelacion: 0.0,
            cancelaciones_por_razon: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TendenciaDia {
    pub fecha: String,
    pub turnos: i64,
    pub cancelados: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstadisticasMes {
    pub mes: String,
    pub total_turnos: i64,
    pub cancelados: i64,
    pub finalizados: i64,
    pub tasa_cancelacion: f64,
    pub tendencia_diaria: Vec<TendenciaDia>,
}

impl EstadisticasMes {
    pub fn vacio(mes: String) -> Self {
        Self {
            mes,
            total_turnos: 0,
            cancelados: 0,
            finalizados: 0,
            tasa_cancelacion: 0.0,
            tendencia_diaria: Vec::new(),
        }
    }
}
