use crate::domain::models::NewClient;
use crate::domain::repository::StoreResult;
use std::fs;
use std::path::{Path, PathBuf};

/// The legacy on-disk client cache: a JSON array of clients written by
/// the pre-remote-store dashboard. Read once at startup, migrated into
/// the client store, then cleared.
pub trait LegacyStore: Send + Sync {
    /// `None` means there is nothing to migrate.
    fn read_clients(&self) -> StoreResult<Option<Vec<NewClient>>>;
    fn clear(&self) -> StoreResult<()>;
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LegacyStore for JsonFileStore {
    fn read_clients(&self) -> StoreResult<Option<Vec<NewClient>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        let clients: Vec<NewClient> = serde_json::from_str(&raw)?;
        Ok(Some(clients))
    }

    fn clear(&self) -> StoreResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
