//! Doctor cell: doctor administration, consulting-room sessions and the
//! per-doctor patient queue.

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Consultorio, Doctor};
pub use router::{consultorio_routes, doctor_routes};
