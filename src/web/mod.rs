//! Liveness endpoint for the hosting platform's process supervisor

mod health;

pub use health::start_health_server;
