use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use shared_models::AppState;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::get_doctores))
        .route("/todos", get(handlers::get_todos_doctores))
        .route("/nuevo", post(handlers::crear_doctor))
        .route("/{doctor_id}", delete(handlers::eliminar_doctor))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/cambiar-estado", post(handlers::cambiar_estado))
        .route("/turnos", get(handlers::get_turnos_doctor))
        .route("/llamar-siguiente", post(handlers::llamar_siguiente))
        .with_state(state)
}

pub fn consultorio_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::get_consultorios))
        .with_state(state)
}
