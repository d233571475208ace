pub mod doctor;
pub mod queue;
pub mod session;
