use chrono::NaiveDate;
use sqlx::SqliteConnection;

use shared_models::AppError;

/// Produces the next display number for a prefix on a given day:
/// `PREFIX + zero-padded(max suffix today + 1, width 3)`.
///
/// Only numerals whose remainder after the prefix is all digits count, so
/// prefix `A` never picks up `AF001`. Unparseable numerals are skipped and,
/// when nothing parseable exists, the sequence restarts at 1. Two concurrent
/// intakes can still read the same maximum; that race is accepted.
pub async fn siguiente_numero(
    conn: &mut SqliteConnection,
    prefijo: &str,
    fecha: NaiveDate,
) -> Result<String, AppError> {
    let numeros: Vec<String> = sqlx::query_scalar(
        "SELECT numero FROM turnos WHERE DATE(timestamp_creacion) = ? AND numero LIKE ?",
    )
    .bind(fecha.format("%Y-%m-%d").to_string())
    .bind(format!("{}%", prefijo))
    .fetch_all(conn)
    .await?;

    let ultimo = numeros
        .iter()
        .filter_map(|numero| numero.strip_prefix(prefijo))
        .filter(|resto| !resto.is_empty() && resto.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|resto| resto.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    Ok(format!("{}{:03}", prefijo, ultimo + 1))
}
