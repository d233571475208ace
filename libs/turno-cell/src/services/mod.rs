pub mod assignment;
pub mod derivation;
pub mod gabinete;
pub mod intake;
pub mod notas;
pub mod numbering;
pub mod turnos;
