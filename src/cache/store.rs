//! Persisted store: the durable record of known summaries and details.
//!
//! The durable format is a single JSON slot holding the whole [`Store`].
//! Reads and writes are best-effort by contract: a missing or corrupt slot
//! reads as empty, and a failed write is logged and swallowed. Persistence
//! is an optimization, never a correctness requirement for the session.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DexError;
use crate::pokeapi::{PokemonDetail, PokemonSummary};

/// Process-wide cached state: accumulated listing summaries plus full or
/// partial details keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
  /// Dedup by id, first-seen order preserved.
  #[serde(default)]
  pub summaries: Vec<PokemonSummary>,
  #[serde(default)]
  pub details: BTreeMap<u32, PokemonDetail>,
}

impl Store {
  /// Append fetched entries whose id is not already present, preserving
  /// existing order and appending new ones in fetched order.
  pub fn merge_summaries(&mut self, fetched: &[PokemonSummary]) {
    for entry in fetched {
      if !self.summaries.iter().any(|s| s.id == entry.id) {
        self.summaries.push(entry.clone());
      }
    }
  }
}

/// Trait for store persistence backends.
pub trait StoreBackend: Send + Sync + 'static {
  /// Deserialize durable state. Missing or corrupt data yields an empty
  /// store; this never fails.
  fn read(&self) -> Store;

  /// Serialize and persist. Failures are logged, never raised.
  fn write(&self, store: &Store);
}

/// Backend persisting the store as a JSON file in the user data directory.
pub struct JsonFileStore {
  path: PathBuf,
}

impl JsonFileStore {
  pub fn open(path: PathBuf) -> Self {
    Self { path }
  }

  /// Open the store at the default location.
  pub fn open_default() -> Result<Self> {
    Ok(Self::open(Self::default_path()?))
  }

  /// Get the default store path.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("podex").join("store.json"))
  }

  /// `Ok(None)` means the slot does not exist yet.
  fn try_read(&self) -> crate::error::Result<Option<Store>> {
    let raw = match std::fs::read(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => {
        return Err(DexError::Storage(format!(
          "failed to read {}: {}",
          self.path.display(),
          e
        )))
      }
    };

    serde_json::from_slice(&raw).map(Some).map_err(|e| {
      DexError::Storage(format!("corrupt store at {}: {}", self.path.display(), e))
    })
  }

  fn try_write(&self, store: &Store) -> crate::error::Result<()> {
    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent).map_err(|e| {
        DexError::Storage(format!("failed to create {}: {}", parent.display(), e))
      })?;
    }

    let serialized = serde_json::to_vec(store)
      .map_err(|e| DexError::Storage(format!("failed to serialize store: {}", e)))?;

    std::fs::write(&self.path, serialized).map_err(|e| {
      DexError::Storage(format!("failed to persist {}: {}", self.path.display(), e))
    })
  }
}

impl StoreBackend for JsonFileStore {
  fn read(&self) -> Store {
    match self.try_read() {
      Ok(Some(store)) => store,
      Ok(None) => {
        debug!(path = %self.path.display(), "no store file yet, starting empty");
        Store::default()
      }
      Err(e) => {
        warn!(error = %e, "treating store as empty");
        Store::default()
      }
    }
  }

  fn write(&self, store: &Store) {
    if let Err(e) = self.try_write(store) {
      warn!(error = %e, "store write skipped");
    }
  }
}

/// In-memory backend for tests and `--no-store` runs. Keeps session state
/// but persists nothing.
#[derive(Default)]
pub struct MemoryStore {
  inner: Mutex<Store>,
}

impl StoreBackend for MemoryStore {
  fn read(&self) -> Store {
    self
      .inner
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  fn write(&self, store: &Store) {
    *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = store.clone();
  }
}
