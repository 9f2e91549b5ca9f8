//! Persistence backends for the channel store.
//!
//! The store treats storage as a synchronous scoped dependency: every
//! mutating operation flushes the full state before reporting success, so
//! a crash between mutation and flush cannot silently lose an acknowledged
//! write.

use agenthub_core::{Error, Result, StoreState};
use std::path::PathBuf;
use tracing::debug;

/// A backend that can load and save the full store state.
///
/// `save` is called under the store's write lock; implementations must not
/// block longer than a local filesystem write.
pub trait Storage: Send + Sync {
    fn name(&self) -> &str;

    /// Load the persisted state. A backend with nothing persisted yet
    /// returns an empty state.
    fn load(&self) -> Result<StoreState>;

    /// Persist the full state. A failure here means the operation that
    /// triggered the flush must not be reported as committed.
    fn save(&self, state: &StoreState) -> Result<()>;
}

/// JSON file storage — the whole store as one human-inspectable document.
///
/// The document maps channel name to `{messages, last_read}`, matching the
/// format the original hub persisted. Writes go to a sibling temp file that
/// is renamed into place, so readers never observe a half-written store.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Storage for JsonFileStorage {
    fn name(&self) -> &str {
        "json-file"
    }

    fn load(&self) -> Result<StoreState> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            // File doesn't exist yet — start empty
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No store file yet, starting empty");
                return Ok(StoreState::new());
            }
            Err(e) => {
                return Err(Error::persistence(format!(
                    "Failed to read store file {}: {e}",
                    self.path.display()
                )));
            }
        };

        let state: StoreState = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), channels = state.len(), "Store loaded");
        Ok(state)
    }

    fn save(&self, state: &StoreState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::persistence(format!("Failed to create store directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(state)?;

        // Write-then-rename keeps the store file whole even if we crash
        // mid-write.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &content)
            .map_err(|e| Error::persistence(format!("Failed to write store file: {e}")))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| Error::persistence(format!("Failed to replace store file: {e}")))?;

        Ok(())
    }
}

/// In-memory storage for tests and ephemeral runs — "persists" into a mutex.
#[derive(Default)]
pub struct MemoryStorage {
    state: std::sync::Mutex<StoreState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self) -> Result<StoreState> {
        Ok(self
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn save(&self, state: &StoreState) -> Result<()> {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state.clone();
        Ok(())
    }
}
