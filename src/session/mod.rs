pub mod sqlite;
pub mod store;
pub mod types;

pub use sqlite::SqliteSessionStore;
pub use store::{InMemorySessionStore, SessionStore};
pub use types::{GREETING, Session, Turn, TurnRole};

use crate::config::{Config, SessionBackend};
use anyhow::Result;
use std::sync::Arc;

/// Build the store selected by `[session] backend`.
pub async fn open_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    match config.session.backend {
        SessionBackend::Memory => Ok(Arc::new(InMemorySessionStore::new())),
        SessionBackend::Sqlite => {
            let path = config.sqlite_session_path();
            tracing::info!(path = %path.display(), "opening SQLite session store");
            Ok(Arc::new(SqliteSessionStore::open(&path).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn memory_backend_is_default() {
        let store = open_store(&Config::default()).await.unwrap();
        let session = store.create_session("u").await.unwrap();
        assert!(store.get_session(&session.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn sqlite_backend_writes_next_to_config() {
        let dir = TempDir::new().unwrap();
        let mut config = Config {
            config_path: dir.path().join("config.toml"),
            ..Config::default()
        };
        config.session.backend = SessionBackend::Sqlite;

        let store = open_store(&config).await.unwrap();
        store.create_session("u").await.unwrap();

        let expected: PathBuf = dir.path().join("sessions.db");
        assert!(expected.exists());
    }
}
