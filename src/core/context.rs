use anyhow::Result;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

use crate::core::credentials::CredentialResolver;
use crate::core::history::HistoryStore;
use crate::core::vault::CredentialVault;

/// Process-scoped application state: the SQLite database plus the stores
/// built on it. Created once at startup, passed explicitly to whatever
/// needs it - no ambient globals.
pub struct AppContext {
    pub history: HistoryStore,
    pub vault: CredentialVault,
    pub resolver: Arc<CredentialResolver>,
    data_dir: PathBuf,
}

impl AppContext {
    /// Open (creating if needed) the database under the given data dir and
    /// initialize every store's schema before returning.
    pub async fn init<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).await?;
        }

        let db_path = data_dir.join("quill.db");
        info!("Opening database at {}", db_path.display());
        let db = Arc::new(Mutex::new(Connection::open(&db_path)?));

        let history = HistoryStore::new(db.clone());
        history.initialize().await?;
        let vault = CredentialVault::new(db.clone());
        vault.initialize().await?;
        let resolver = Arc::new(CredentialResolver::from_env(vault.clone()));

        Ok(Self {
            history,
            vault,
            resolver,
            data_dir,
        })
    }

    /// Default data dir: the platform data directory, `QUILL_DATA_DIR`
    /// overriding it (used by tests and the service manager).
    pub fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("QUILL_DATA_DIR") {
            return PathBuf::from(dir);
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quill")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// In-memory context for tests. No filesystem side-effects.
#[cfg(test)]
pub async fn test_context() -> AppContext {
    let db = Arc::new(Mutex::new(
        Connection::open_in_memory().expect("in-memory db"),
    ));
    let history = HistoryStore::new(db.clone());
    history.initialize().await.expect("init history");
    let vault = CredentialVault::new(db.clone());
    vault.initialize().await.expect("init vault");
    let resolver = Arc::new(CredentialResolver::new(vault.clone(), None));
    AppContext {
        history,
        vault,
        resolver,
        data_dir: std::env::temp_dir(),
    }
}
