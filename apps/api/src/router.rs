use std::sync::Arc;

use axum::{routing::get, Router};

use doctor_cell::router::{consultorio_routes, doctor_routes};
use notification_cell::router::notification_routes;
use shared_models::AppState;
use stats_cell::router::stats_routes;
use turno_cell::router::{estacion_routes, turno_routes};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Turnero en línea" }))
        .nest("/api/turnos", turno_routes(state.clone()))
        .nest("/api/doctores", doctor_routes(state.clone()))
        .nest("/api/consultorios", consultorio_routes(state.clone()))
        .nest("/api/estaciones", estacion_routes(state.clone()))
        .nest("/api/estadisticas", stats_routes(state.clone()))
        .nest("/api/notificaciones", notification_routes(state))
}
