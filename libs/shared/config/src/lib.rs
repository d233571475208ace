use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            database_path: env::var("TURNERO_DB_PATH")
                .unwrap_or_else(|_| {
                    warn!("TURNERO_DB_PATH not set, using data/turnos.db");
                    "data/turnos.db".to_string()
                }),
            bind_addr: env::var("TURNERO_BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            max_connections: env::var("TURNERO_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            busy_timeout_secs: env::var("TURNERO_BUSY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        };

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.database_path.is_empty() && !self.bind_addr.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = AppConfig {
            database_path: "data/turnos.db".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            max_connections: 5,
            busy_timeout_secs: 30,
        };
        assert!(config.is_configured());
    }
}
