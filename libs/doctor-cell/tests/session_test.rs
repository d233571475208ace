use sqlx::SqlitePool;
use tempfile::TempDir;

use doctor_cell::models::CrearDoctorRequest;
use doctor_cell::services::{doctor, queue, session};
use shared_config::AppConfig;
use shared_models::{AppError, EstadoDoctor};

async fn test_pool() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = AppConfig {
        database_path: temp_dir
            .path()
            .join("turnos.db")
            .to_string_lossy()
            .into_owned(),
        bind_addr: "127.0.0.1:0".to_string(),
        max_connections: 2,
        busy_timeout_secs: 5,
    };
    let pool = shared_database::init_db_pool(&config).await.unwrap();
    (pool, temp_dir)
}

async fn crear_doctor(pool: &SqlitePool, nombre: &str) -> i64 {
    doctor::crear(
        pool,
        CrearDoctorRequest {
            nombre: Some(nombre.to_string()),
            especialidad: Some("Oftalmología".to_string()),
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn login_ocupa_consultorio_y_activa_doctor() {
    let (pool, _dir) = test_pool().await;
    let doctor_id = crear_doctor(&pool, "Dra. Rivas").await;

    // New doctors start out of the active roster.
    assert!(doctor::listar_activos(&pool).await.unwrap().is_empty());

    let nombre = session::login(&pool, doctor_id, 1, EstadoDoctor::Disponible)
        .await
        .unwrap();
    assert_eq!(nombre, "Dra. Rivas");

    let activos = doctor::listar_activos(&pool).await.unwrap();
    assert_eq!(activos.len(), 1);
    assert!(activos[0].activo);
    assert!(activos[0].disponible);
    assert_eq!(activos[0].estado_detallado, "DISPONIBLE");

    let consultorios = session::listar_consultorios(&pool).await.unwrap();
    let ocupado = consultorios.iter().find(|c| c.id == 1).unwrap();
    assert!(ocupado.ocupado);
    assert_eq!(ocupado.doctor_actual, Some(doctor_id));
    assert_eq!(ocupado.doctor_nombre.as_deref(), Some("Dra. Rivas"));
    assert!(ocupado.timestamp_ocupado.is_some());
}

#[tokio::test]
async fn login_en_otro_consultorio_libera_el_anterior() {
    let (pool, _dir) = test_pool().await;
    let doctor_id = crear_doctor(&pool, "Dra. Rivas").await;

    session::login(&pool, doctor_id, 1, EstadoDoctor::Disponible)
        .await
        .unwrap();
    session::login(&pool, doctor_id, 2, EstadoDoctor::Disponible)
        .await
        .unwrap();

    // One room per doctor: the first is released when the second is taken.
    let consultorios = session::listar_consultorios(&pool).await.unwrap();
    let primero = consultorios.iter().find(|c| c.id == 1).unwrap();
    assert!(!primero.ocupado);
    assert!(primero.doctor_actual.is_none());
    let segundo = consultorios.iter().find(|c| c.id == 2).unwrap();
    assert!(segundo.ocupado);
    assert_eq!(segundo.doctor_actual, Some(doctor_id));

    let ocupados: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM consultorios WHERE doctor_actual = ? AND ocupado = 1",
    )
    .bind(doctor_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(ocupados, 1);
}

#[tokio::test]
async fn login_en_consultorio_ocupado_no_muta_nada() {
    let (pool, _dir) = test_pool().await;
    let primero = crear_doctor(&pool, "Dra. Rivas").await;
    let segundo = crear_doctor(&pool, "Dr. Soto").await;

    session::login(&pool, primero, 1, EstadoDoctor::Disponible)
        .await
        .unwrap();

    let err = session::login(&pool, segundo, 1, EstadoDoctor::Disponible)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Business(_)));

    // The room still belongs to the first doctor and the second stayed AUSENTE.
    let consultorios = session::listar_consultorios(&pool).await.unwrap();
    let room = consultorios.iter().find(|c| c.id == 1).unwrap();
    assert_eq!(room.doctor_actual, Some(primero));

    let todos = doctor_cell::services::doctor::listar_todos(&pool).await.unwrap();
    let rechazado = todos.iter().find(|d| d.id == segundo).unwrap();
    assert!(!rechazado.activo);
    assert_eq!(rechazado.estado_detallado, "AUSENTE");
}

#[tokio::test]
async fn login_como_ocupado_no_recibe_lista_de_espera() {
    let (pool, _dir) = test_pool().await;
    let doctor_id = crear_doctor(&pool, "Dra. Rivas").await;

    session::login(&pool, doctor_id, 2, EstadoDoctor::Ocupado)
        .await
        .unwrap();

    let activos = doctor::listar_activos(&pool).await.unwrap();
    assert_eq!(activos.len(), 1);
    assert!(activos[0].activo);
    assert!(!activos[0].disponible);
}

#[tokio::test]
async fn logout_libera_consultorios_y_deja_ausente() {
    let (pool, _dir) = test_pool().await;
    let doctor_id = crear_doctor(&pool, "Dra. Rivas").await;
    session::login(&pool, doctor_id, 1, EstadoDoctor::Disponible)
        .await
        .unwrap();

    session::logout(&pool, doctor_id).await.unwrap();

    let consultorios = session::listar_consultorios(&pool).await.unwrap();
    assert!(consultorios.iter().all(|c| !c.ocupado && c.doctor_actual.is_none()));

    let todos = doctor::listar_todos(&pool).await.unwrap();
    let d = todos.iter().find(|d| d.id == doctor_id).unwrap();
    assert!(!d.activo);
    assert!(!d.disponible);
    assert_eq!(d.estado_detallado, "AUSENTE");

    // Logging out twice is harmless.
    session::logout(&pool, doctor_id).await.unwrap();
}

#[tokio::test]
async fn cambiar_estado_aplica_banderas() {
    let (pool, _dir) = test_pool().await;
    let doctor_id = crear_doctor(&pool, "Dra. Rivas").await;

    session::cambiar_estado(&pool, doctor_id, EstadoDoctor::Ocupado)
        .await
        .unwrap();
    let todos = doctor::listar_todos(&pool).await.unwrap();
    let d = todos.iter().find(|d| d.id == doctor_id).unwrap();
    assert!(d.activo);
    assert!(!d.disponible);
    assert_eq!(d.estado_detallado, "OCUPADO");

    session::cambiar_estado(&pool, doctor_id, EstadoDoctor::Ausente)
        .await
        .unwrap();
    let todos = doctor::listar_todos(&pool).await.unwrap();
    let d = todos.iter().find(|d| d.id == doctor_id).unwrap();
    assert!(!d.activo);
    assert!(!d.disponible);
}

#[tokio::test]
async fn eliminar_doctor_con_turnos_activos_se_rechaza() {
    let (pool, _dir) = test_pool().await;
    let doctor_id = crear_doctor(&pool, "Dra. Rivas").await;

    sqlx::query(
        "INSERT INTO turnos (numero, paciente_nombre, estado, doctor_asignado)
         VALUES ('A001', 'Juan Pérez', 'PENDIENTE', ?)",
    )
    .bind(doctor_id)
    .execute(&pool)
    .await
    .unwrap();

    let err = doctor::eliminar(&pool, doctor_id).await.unwrap_err();
    assert!(matches!(err, AppError::Business(_)));
    assert_eq!(doctor::listar_todos(&pool).await.unwrap().len(), 1);

    // Once the queue drains the doctor can go.
    sqlx::query("UPDATE turnos SET estado = 'FINALIZADO' WHERE doctor_asignado = ?")
        .bind(doctor_id)
        .execute(&pool)
        .await
        .unwrap();
    doctor::eliminar(&pool, doctor_id).await.unwrap();
    assert!(doctor::listar_todos(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn eliminar_doctor_inexistente_es_not_found() {
    let (pool, _dir) = test_pool().await;
    let err = doctor::eliminar(&pool, 99).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn llamar_siguiente_con_cola_vacia_devuelve_none() {
    let (pool, _dir) = test_pool().await;
    let doctor_id = crear_doctor(&pool, "Dra. Rivas").await;
    session::login(&pool, doctor_id, 1, EstadoDoctor::Disponible)
        .await
        .unwrap();

    let llamado = queue::llamar_siguiente(&pool, doctor_id).await.unwrap();
    assert!(llamado.is_none());
}
