use anyhow::Result;
use chrono::{Datelike, Utc};
use sqlx::SqlitePool;
use tracing::warn;

use crate::models::{CancelacionPorRazon, EstadisticasDia, EstadisticasMes, TendenciaDia};

/// Daily rollup. Statistics are best-effort: any storage failure yields the
/// zero-filled shape instead of an error.
pub async fn estadisticas_dia(pool: &SqlitePool, fecha: Option<String>) -> EstadisticasDia {
    let fecha = fecha.unwrap_or_else(|| Utc::now().date_naive().format("%Y-%m-%d").to_string());
    match computar_dia(pool, &fecha).await {
        Ok(stats) => stats,
        Err(e) => {
            warn!("fallo al computar estadísticas del día {}: {}", fecha, e);
            EstadisticasDia::vacio(fecha)
        }
    }
}

async fn computar_dia(pool: &SqlitePool, fecha: &str) -> Result<EstadisticasDia> {
    let (total, cancelados, finalizados, activos): (i64, Option<i64>, Option<i64>, Option<i64>) =
        sqlx::query_as(
            "SELECT COUNT(*),
                    SUM(CASE WHEN estado = 'CANCELADO' THEN 1 ELSE 0 END),
                    SUM(CASE WHEN estado = 'FINALIZADO' THEN 1 ELSE 0 END),
                    SUM(CASE WHEN estado NOT IN ('CANCELADO', 'FINALIZADO') THEN 1 ELSE 0 END)
             FROM turnos
             WHERE DATE(timestamp_creacion) = ?",
        )
        .bind(fecha)
        .fetch_one(pool)
        .await?;

    let cancelaciones_por_razon = sqlx::query_as::<_, CancelacionPorRazon>(
        "SELECT razon_cancelacion, COUNT(*) as cantidad
         FROM turnos
         WHERE DATE(timestamp_creacion) = ? AND estado = 'CANCELADO'
         GROUP BY razon_cancelacion",
    )
    .bind(fecha)
    .fetch_all(pool)
    .await?;

    let cancelados = cancelados.unwrap_or(0);
    Ok(EstadisticasDia {
        fecha: fecha.to_string(),
        total_turnos: total,
        cancelados,
        finalizados: finalizados.unwrap_or(0),
        activos: activos.unwrap_or(0),
        tasa_cancelacion: tasa(cancelados, total),
        cancelaciones_por_razon,
    })
}

pub async fn estadisticas_mes(pool: &SqlitePool, mes: Option<u32>, anio: Option<i32>) -> EstadisticasMes {
    let hoy = Utc::now().date_naive();
    let mes = mes.unwrap_or_else(|| hoy.month());
    let anio = anio.unwrap_or_else(|| hoy.year());
    let clave = format!("{:04}-{:02}", anio, mes);

    match computar_mes(pool, &clave).await {
        Ok(stats) => stats,
        Err(e) => {
            warn!("fallo al computar estadísticas del mes {}: {}", clave, e);
            EstadisticasMes::vacio(clave)
        }
    }
}

async fn computar_mes(pool: &SqlitePool, clave: &str) -> Result<EstadisticasMes> {
    let (total, cancelados, finalizados): (i64, Option<i64>, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*),
                SUM(CASE WHEN estado = 'CANCELADO' THEN 1 ELSE 0 END),
                SUM(CASE WHEN estado = 'FINALIZADO' THEN 1 ELSE 0 END)
         FROM turnos
         WHERE strftime('%Y-%m', timestamp_creacion) = ?",
    )
    .bind(clave)
    .fetch_one(pool)
    .await?;

    let tendencia_diaria = sqlx::query_as::<_, TendenciaDia>(
        "SELECT DATE(timestamp_creacion) as fecha,
                COUNT(*) as turnos,
                SUM(CASE WHEN estado = 'CANCELADO' THEN 1 ELSE 0 END) as cancelados
         FROM turnos
         WHERE strftime('%Y-%m', timestamp_creacion) = ?
         GROUP BY DATE(timestamp_creacion)
         ORDER BY fecha",
    )
    .bind(clave)
    .fetch_all(pool)
    .await?;

    let cancelados = cancelados.unwrap_or(0);
    Ok(EstadisticasMes {
        mes: clave.to_string(),
        total_turnos: total,
        cancelados,
        finalizados: finalizados.unwrap_or(0),
        tasa_cancelacion: tasa(cancelados, total),
        tendencia_diaria,
    })
}

fn tasa(cancelados: i64, total: i64) -> f64 {
    if total > 0 {
        cancelados as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}
