//! HTTP surface over the in-memory doctor-to-reception mailbox.

pub mod handlers;
pub mod models;
pub mod router;

pub use router::notification_routes;
