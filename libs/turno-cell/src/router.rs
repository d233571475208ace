use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use shared_models::AppState;

use crate::handlers;

pub fn turno_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::get_turnos))
        .route("/nuevo", post(handlers::crear_turno))
        .route("/{turno_id}", get(handlers::get_turno))
        .route("/{turno_id}/cancelar", put(handlers::cancelar_turno))
        .route("/{turno_id}/editar", put(handlers::editar_turno))
        .route("/{turno_id}/derivar", post(handlers::derivar_turno))
        .route("/{turno_id}/afiliacion", post(handlers::completar_afiliacion))
        .route("/{turno_id}/estudios", post(handlers::solicitar_estudios))
        .route("/{turno_id}/estudios/pago", put(handlers::confirmar_pago_estudios))
        .route(
            "/{turno_id}/mediciones",
            post(handlers::registrar_mediciones).get(handlers::get_ultima_medicion),
        )
        .with_state(state)
}

/// Static reference data exposed for the derivation picker.
pub fn estacion_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::get_estaciones))
        .with_state(state)
}
