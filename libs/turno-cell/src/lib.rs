//! Turno lifecycle cell: intake and numbering, waiting-list assignment,
//! station derivation and the gabinete studies sub-flow.

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Turno, TurnoResumen};
pub use router::{estacion_routes, turno_routes};
