//! End-to-end patient journeys: reception intake through consultation,
//! gabinete and exit.

use sqlx::SqlitePool;
use tempfile::TempDir;

use doctor_cell::models::CrearDoctorRequest;
use doctor_cell::services::{doctor, queue, session};
use shared_config::AppConfig;
use shared_models::EstadoDoctor;
use turno_cell::models::{CrearTurnoRequest, DerivarRequest, MedicionRequest, SolicitarEstudiosRequest};
use turno_cell::services::{assignment, derivation, gabinete, intake, turnos};

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

async fn doctor_en_consultorio(pool: &SqlitePool, nombre: &str, consultorio: i64) -> i64 {
    let id = doctor::crear(
        pool,
        CrearDoctorRequest {
            nombre: Some(nombre.to_string()),
            especialidad: None,
        },
    )
    .await
    .unwrap();
    session::login(pool, id, consultorio, EstadoDoctor::Disponible)
        .await
        .unwrap();
    id
}

#[tokio::test]
async fn paciente_sin_cita_afiliado_de_ingreso_a_salida() {
    let (pool, _dir) = test_pool().await;
    let doctor_id = doctor_en_consultorio(&pool, "Dra. Rivas", 1).await;

    let ingreso = intake::crear_turno(
        &pool,
        CrearTurnoRequest {
            paciente_nombre: Some("Rosa Díaz".to_string()),
            paciente_edad: Some(70),
            tipo: Some("SIN_CITA".to_string()),
            afiliacion: Some("YA_AFILIADO".to_string()),
            estacion_inicial: None,
            doctor_asignado: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(ingreso.doctor_asignado, Some(doctor_id));

    let cola = queue::turnos_pendientes(&pool, doctor_id).await.unwrap();
    assert_eq!(cola.len(), 1);
    assert_eq!(cola[0].id, ingreso.turno_id);

    let llamado = queue::llamar_siguiente(&pool, doctor_id)
        .await
        .unwrap()
        .expect("debe haber paciente en cola");
    assert_eq!(llamado.id, ingreso.turno_id);
    assert_eq!(llamado.estado, "EN_ATENCION");

    // Mid-consultation the doctor is off the assignment pool.
    let activos = doctor::listar_activos(&pool).await.unwrap();
    assert!(!activos[0].disponible);
    assert_eq!(activos[0].estado_detallado, "OCUPADO");

    let derivado = derivation::derivar_paciente(
        &pool,
        ingreso.turno_id,
        DerivarRequest {
            destino: "SALIDA".to_string(),
            vuelve_conmigo: false,
            notas: Some("alta sin tratamiento".to_string()),
            usuario: Some("Dra. Rivas".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(derivado.estado, "FINALIZADO");
    assert!(derivado.tiempo_total.is_some());

    // Deriving ends the consultation: the doctor is available again.
    let activos = doctor::listar_activos(&pool).await.unwrap();
    assert!(activos[0].disponible);
    assert_eq!(activos[0].estado_detallado, "DISPONIBLE");

    // The journey is in the audit trail, oldest to newest.
    let acciones: Vec<String> = sqlx::query_scalar(
        "SELECT accion FROM historial_turnos WHERE turno_id = ? ORDER BY id",
    )
    .bind(ingreso.turno_id)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(
        acciones,
        vec!["CREADO", "ASIGNADO_DOCTOR", "LLAMADO_A_CONSULTA", "DERIVADO_A_SALIDA"]
    );
}

#[tokio::test]
async fn ciclo_de_gabinete_vuelve_a_la_cola_del_doctor() {
    let (pool, _dir) = test_pool().await;
    let doctor_id = doctor_en_consultorio(&pool, "Dra. Rivas", 1).await;

    let ingreso = intake::crear_turno(
        &pool,
        CrearTurnoRequest {
            paciente_nombre: Some("Juan Pérez".to_string()),
            paciente_edad: Some(58),
            tipo: Some("CITA".to_string()),
            afiliacion: None,
            estacion_inicial: Some(4),
            doctor_asignado: Some(doctor_id),
        },
    )
    .await
    .unwrap();

    queue::llamar_siguiente(&pool, doctor_id).await.unwrap().unwrap();

    gabinete::solicitar_estudios(
        &pool,
        ingreso.turno_id,
        SolicitarEstudiosRequest {
            estudios: vec!["Cálculo de LIO".to_string()],
            usuario: Some("Dra. Rivas".to_string()),
        },
    )
    .await
    .unwrap();
    gabinete::confirmar_pago(&pool, ingreso.turno_id).await.unwrap();
    gabinete::finalizar_mediciones(
        &pool,
        ingreso.turno_id,
        MedicionRequest {
            agudeza_visual_od: Some("20/60".to_string()),
            agudeza_visual_oi: Some("20/50".to_string()),
            presion_intraocular_od: None,
            presion_intraocular_oi: None,
            queratometria_od: Some("43.5".to_string()),
            queratometria_oi: Some("43.2".to_string()),
            refraccion_od: None,
            refraccion_oi: None,
            observaciones: None,
            atendido_por: Some("gabinete".to_string()),
        },
    )
    .await
    .unwrap();

    // After measurements the patient is PENDIENTE again with the same doctor.
    let cola = queue::turnos_pendientes(&pool, doctor_id).await.unwrap();
    assert_eq!(cola.len(), 1);
    assert_eq!(cola[0].id, ingreso.turno_id);

    let turno = turnos::obtener(&pool, ingreso.turno_id).await.unwrap();
    assert!(turno.requiere_retorno);
    assert_eq!(turno.estacion_actual, Some(4));
}

#[tokio::test]
async fn afiliacion_completada_asigna_al_doctor_menos_cargado() {
    let (pool, _dir) = test_pool().await;
    let cargado = doctor_en_consultorio(&pool, "Dra. Rivas", 1).await;
    let libre = doctor_en_consultorio(&pool, "Dr. Soto", 2).await;

    // Load the first doctor with two pending turnos.
    for numero in ["A001", "A002"] {
        sqlx::query(
            "INSERT INTO turnos (numero, paciente_nombre, estado, doctor_asignado, estacion_actual)
             VALUES (?, 'Relleno', 'PENDIENTE', ?, 4)",
        )
        .bind(numero)
        .bind(cargado)
        .execute(&pool)
        .await
        .unwrap();
    }

    let ingreso = intake::crear_turno(
        &pool,
        CrearTurnoRequest {
            paciente_nombre: Some("Pedro Gómez".to_string()),
            paciente_edad: Some(45),
            tipo: Some("SIN_CITA".to_string()),
            afiliacion: Some("NO_AFILIADO".to_string()),
            estacion_inicial: None,
            doctor_asignado: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(ingreso.estacion, 2);

    let asignacion = assignment::completar_afiliacion(&pool, ingreso.turno_id)
        .await
        .unwrap()
        .expect("hay doctores disponibles");
    assert_eq!(asignacion.doctor_id, libre);
    assert_eq!(asignacion.posicion, 1);

    let turno = turnos::obtener(&pool, ingreso.turno_id).await.unwrap();
    assert_eq!(turno.doctor_asignado, Some(libre));
    assert_eq!(turno.estacion_actual, Some(4));
    assert_eq!(turno.estado, "PENDIENTE");
}

#[tokio::test]
async fn afiliacion_sin_doctores_queda_esperando() {
    let (pool, _dir) = test_pool().await;

    let ingreso = intake::crear_turno(
        &pool,
        CrearTurnoRequest {
            paciente_nombre: Some("Pedro Gómez".to_string()),
            paciente_edad: Some(45),
            tipo: Some("SIN_CITA".to_string()),
            afiliacion: Some("NO_AFILIADO".to_string()),
            estacion_inicial: None,
            doctor_asignado: None,
        },
    )
    .await
    .unwrap();

    let asignacion = assignment::completar_afiliacion(&pool, ingreso.turno_id)
        .await
        .unwrap();
    assert!(asignacion.is_none());

    let turno = turnos::obtener(&pool, ingreso.turno_id).await.unwrap();
    assert_eq!(turno.estado, "ESPERANDO_ASIGNACION");
    assert_eq!(turno.estacion_actual, Some(4));
    assert!(turno.doctor_asignado.is_none());
}
