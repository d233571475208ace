pub mod domain;
pub mod error;
pub mod mailbox;
pub mod state;

pub use domain::{
    Afiliacion, DestinoDerivacion, Estacion, EstadoDoctor, TurnoStatus, TurnoTipo, prioridad,
};
pub use error::AppError;
pub use mailbox::{Notificacion, NotificationMailbox, MAILBOX_CAPACITY};
pub use state::AppState;
