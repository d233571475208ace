use std::sync::Arc;

use axum::{routing::get, Router};

use shared_models::AppState;

use crate::handlers;

pub fn stats_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/dia", get(handlers::get_estadisticas_dia))
        .route("/dia/{fecha}", get(handlers::get_estadisticas_dia_fecha))
        .route("/mes", get(handlers::get_estadisticas_mes))
        .route("/mes/{mes}/{anio}", get(handlers::get_estadisticas_mes_fecha))
        .route("/historial/{turno_id}", get(handlers::get_historial_turno))
        .with_state(state)
}
