use sqlx::SqlitePool;

use shared_config::AppConfig;

use crate::mailbox::NotificationMailbox;

/// Shared state handed to every cell router as `Arc<AppState>`.
pub struct AppState {
    pub config: AppConfig,
    pub db: SqlitePool,
    pub mailbox: NotificationMailbox,
}

impl AppState {
    pub fn new(config: AppConfig, db: SqlitePool) -> Self {
        Self {
            config,
            db,
            mailbox: NotificationMailbox::new(),
        }
    }
}
