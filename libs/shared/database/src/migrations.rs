//! Startup migrations.
//!
//! Everything here is additive and idempotent: `CREATE TABLE IF NOT EXISTS`
//! for the base schema, `PRAGMA table_info`-guarded `ALTER TABLE ADD COLUMN`
//! for columns that arrived later, and `INSERT OR IGNORE` seeds for the
//! static reference rows. A startup against any earlier schema state must
//! succeed without losing data.

use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

const BASE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS doctores (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nombre TEXT NOT NULL,
        especialidad TEXT,
        activo BOOLEAN NOT NULL DEFAULT 0,
        disponible BOOLEAN NOT NULL DEFAULT 1,
        estado_detallado TEXT NOT NULL DEFAULT 'AUSENTE'
    );

    CREATE TABLE IF NOT EXISTS consultorios (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        numero TEXT NOT NULL UNIQUE,
        ocupado BOOLEAN NOT NULL DEFAULT 0,
        doctor_actual INTEGER,
        timestamp_ocupado TIMESTAMP,
        FOREIGN KEY (doctor_actual) REFERENCES doctores (id)
    );

    CREATE TABLE IF NOT EXISTS estaciones (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nombre TEXT NOT NULL,
        descripcion TEXT
    );

    CREATE TABLE IF NOT EXISTS turnos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        numero TEXT NOT NULL,
        paciente_nombre TEXT NOT NULL,
        paciente_edad INTEGER,
        tipo TEXT NOT NULL DEFAULT 'CITA',
        estado TEXT NOT NULL DEFAULT 'PENDIENTE',
        estacion_actual INTEGER,
        estacion_siguiente INTEGER,
        doctor_asignado INTEGER,
        prioridad INTEGER NOT NULL DEFAULT 1,
        timestamp_creacion TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        timestamp_atencion TIMESTAMP,
        timestamp_cancelado TIMESTAMP,
        razon_cancelacion TEXT,
        tiempo_total INTEGER,
        FOREIGN KEY (estacion_actual) REFERENCES estaciones (id),
        FOREIGN KEY (estacion_siguiente) REFERENCES estaciones (id),
        FOREIGN KEY (doctor_asignado) REFERENCES doctores (id)
    );

    CREATE TABLE IF NOT EXISTS historial_turnos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        turno_id INTEGER NOT NULL,
        accion TEXT NOT NULL,
        detalles TEXT,
        timestamp TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        usuario TEXT NOT NULL DEFAULT 'sistema',
        FOREIGN KEY (turno_id) REFERENCES turnos (id)
    );

    CREATE TABLE IF NOT EXISTS mediciones_calculos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        turno_id INTEGER NOT NULL,
        agudeza_visual_od TEXT,
        agudeza_visual_oi TEXT,
        presion_intraocular_od TEXT,
        presion_intraocular_oi TEXT,
        queratometria_od TEXT,
        queratometria_oi TEXT,
        refraccion_od TEXT,
        refraccion_oi TEXT,
        observaciones TEXT,
        atendido_por TEXT,
        timestamp TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (turno_id) REFERENCES turnos (id)
    );

    CREATE INDEX IF NOT EXISTS idx_turnos_estado ON turnos (estado);
    CREATE INDEX IF NOT EXISTS idx_turnos_doctor ON turnos (doctor_asignado);
    CREATE INDEX IF NOT EXISTS idx_turnos_creacion ON turnos (timestamp_creacion);
    CREATE INDEX IF NOT EXISTS idx_historial_turno ON historial_turnos (turno_id);
    CREATE INDEX IF NOT EXISTS idx_mediciones_turno ON mediciones_calculos (turno_id);
"#;

/// Columns added after the base `turnos` shape shipped. Order matters only
/// for readability; each entry is checked independently.
const TURNOS_ADDED_COLUMNS: &[(&str, &str)] = &[
    ("notas", "TEXT NOT NULL DEFAULT ''"),
    ("estudios_solicitados", "TEXT NOT NULL DEFAULT '[]'"),
    ("requiere_retorno", "BOOLEAN NOT NULL DEFAULT 0"),
];

const ESTACIONES: &[(i64, &str, &str)] = &[
    (1, "Recepción", "Punto de entrada y salida del paciente"),
    (2, "Trabajo Social", "Atención social y afiliación de pacientes sin cita"),
    (3, "Toma de Cálculos Correspondientes", "Agudeza visual, presión intraocular, queratometría, refracción"),
    (4, "Consulta Médica", "Consulta con el médico asignado"),
    (5, "Farmacia", "Entrega de medicamentos"),
    (6, "Asesoría Visual", "Orientación sobre lentes"),
    (7, "Estudios Especiales", "Exámenes especializados"),
    (8, "Salida", "Final del proceso"),
];

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Aplicando migraciones...");

    let mut tx = pool.begin().await.context("no se pudo iniciar la transacción de migración")?;

    sqlx::query(BASE_SCHEMA)
        .execute(&mut *tx)
        .await
        .context("fallo al crear el esquema base")?;

    for (column, declaration) in TURNOS_ADDED_COLUMNS {
        if column_exists(&mut tx, "turnos", column).await? {
            debug!("columna turnos.{} ya existe", column);
            continue;
        }
        sqlx::query(&format!("ALTER TABLE turnos ADD COLUMN {} {}", column, declaration))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("fallo al agregar turnos.{}", column))?;
        info!("columna turnos.{} agregada", column);
    }

    for (id, nombre, descripcion) in ESTACIONES {
        sqlx::query("INSERT OR IGNORE INTO estaciones (id, nombre, descripcion) VALUES (?, ?, ?)")
            .bind(id)
            .bind(nombre)
            .bind(descripcion)
            .execute(&mut *tx)
            .await?;
    }

    for n in 1..=5 {
        sqlx::query("INSERT OR IGNORE INTO consultorios (numero) VALUES (?)")
            .bind(format!("Consultorio {}", n))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await.context("no se pudo confirmar la migración")?;
    info!("Migraciones aplicadas");
    Ok(())
}

async fn column_exists(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    table: &str,
    column: &str,
) -> Result<bool> {
    let rows = sqlx::query(&format!("PRAGMA table_info({})", table))
        .fetch_all(&mut **tx)
        .await
        .with_context(|| format!("no se pudo inspeccionar la tabla {}", table))?;

    Ok(rows.iter().any(|row| {
        row.try_get::<String, _>("name")
            .map(|name| name == column)
            .unwrap_or(false)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqliteConnectOptions;
    use sqlx::sqlite::SqlitePoolOptions;
    use tempfile::tempdir;

    async fn open_pool(path: &std::path::Path) -> Result<SqlitePool> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .foreign_keys(true);
        Ok(SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await?)
    }

    #[tokio::test]
    async fn migrations_are_idempotent() -> Result<()> {
        let temp_dir = tempdir()?;
        let pool = open_pool(&temp_dir.path().join("mig.db")).await?;

        run_migrations(&pool).await?;
        run_migrations(&pool).await?;

        let estaciones: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM estaciones")
            .fetch_one(&pool)
            .await?;
        assert_eq!(estaciones, 8);
        Ok(())
    }

    #[tokio::test]
    async fn upgrade_from_pre_notas_schema_keeps_rows() -> Result<()> {
        let temp_dir = tempdir()?;
        let pool = open_pool(&temp_dir.path().join("old.db")).await?;

        // Simulate a database created before the note-log columns existed.
        sqlx::query(
            "CREATE TABLE turnos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                numero TEXT NOT NULL,
                paciente_nombre TEXT NOT NULL,
                paciente_edad INTEGER,
                tipo TEXT NOT NULL DEFAULT 'CITA',
                estado TEXT NOT NULL DEFAULT 'PENDIENTE',
                estacion_actual INTEGER,
                estacion_siguiente INTEGER,
                doctor_asignado INTEGER,
                prioridad INTEGER NOT NULL DEFAULT 1,
                timestamp_creacion TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                timestamp_atencion TIMESTAMP,
                timestamp_cancelado TIMESTAMP,
                razon_cancelacion TEXT,
                tiempo_total INTEGER
            )",
        )
        .execute(&pool)
        .await?;
        sqlx::query("INSERT INTO turnos (numero, paciente_nombre, paciente_edad) VALUES ('A001', 'Juan Pérez', 61)")
            .execute(&pool)
            .await?;

        run_migrations(&pool).await?;

        let (numero, notas): (String, String) =
            sqlx::query_as("SELECT numero, notas FROM turnos WHERE id = 1")
                .fetch_one(&pool)
                .await?;
        assert_eq!(numero, "A001");
        assert_eq!(notas, "");
        Ok(())
    }
}
