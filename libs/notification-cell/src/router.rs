use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use shared_models::AppState;

use crate::handlers;

pub fn notification_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::get_notificaciones))
        .route("/nueva", post(handlers::crear_notificacion))
        .route("/{id}/leida", put(handlers::marcar_leida))
        .route("/leidas", put(handlers::marcar_todas_leidas))
        .with_state(state)
}
