use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CrearNotificacionRequest {
    pub doctor_id: i64,
    pub consultorio: Option<String>,
    pub mensaje: Option<String>,
    pub tipo: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListarQuery {
    #[serde(default)]
    pub no_leidas: bool,
}
