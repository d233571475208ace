pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{EstadisticasDia, EstadisticasMes, HistorialEntry};
pub use router::stats_routes;
pub use services::history::registrar_historial;
