//! JSON snapshot store.
//!
//! Wraps a [`MemoryStore`] and rewrites the whole snapshot to disk after each
//! mutation. Writes go to a sibling temp file that is renamed over the target,
//! so a crash never leaves a half-written store behind. A failed write rolls
//! the in-memory state back, so memory never runs ahead of disk.
//!
//! Every mutation rewrites the full snapshot. Generating a community of `n`
//! members therefore costs `n + 1` flushes of a growing file; fine for the
//! catalog sizes this tool targets.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::community::Community;
use crate::error::{Error, Result};
use crate::persona::{Identity, Persona};

use super::memory::{MemoryStore, Snapshot};
use super::Storage;

/// File-backed [`Storage`].
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
    /// Serializes mutations so snapshots hit disk in mutation order.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    /// A missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
                debug!(path = %parent.display(), "Created store directory");
            }
        }

        let snapshot = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            let snapshot: Snapshot = serde_json::from_str(&content)?;
            info!(
                path = %path.display(),
                personas = snapshot.personas.len(),
                identities = snapshot.identities.len(),
                communities = snapshot.communities.len(),
                "Store loaded"
            );
            snapshot
        } else {
            debug!(path = %path.display(), "No store file yet, starting empty");
            Snapshot::default()
        };

        Ok(Self {
            path,
            inner: MemoryStore::from_snapshot(snapshot),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Caller must hold `write_lock`.
    fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.inner.snapshot())?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| Error::IoWrite {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| Error::IoWrite {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Apply `mutate` to the in-memory store and flush it. If the flush
    /// fails the previous contents are restored and a storage error returned.
    fn commit<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&MemoryStore) -> Result<()>,
    {
        let _guard = self.write_lock.lock();
        let previous = self.inner.snapshot();
        mutate(&self.inner)?;

        if let Err(e) = self.flush() {
            self.inner.restore(previous);
            warn!(path = %self.path.display(), error = %e, "Store write failed, change rolled back");
            return Err(Error::storage(format!("failed to save {}: {}", self.path.display(), e)));
        }
        Ok(())
    }
}

impl Storage for FileStore {
    fn list_personas(&self) -> Result<Vec<Persona>> {
        self.inner.list_personas()
    }

    fn create_persona(&self, persona: &mut Persona) -> Result<()> {
        self.commit(|store| store.create_persona(persona))
    }

    fn create_identity(&self, identity: &mut Identity) -> Result<()> {
        self.commit(|store| store.create_identity(identity))
    }

    fn get_identity(&self, id: &str) -> Result<Identity> {
        self.inner.get_identity(id)
    }

    fn list_identities(&self) -> Result<Vec<Identity>> {
        self.inner.list_identities()
    }

    fn create_community(&self, community: &mut Community) -> Result<()> {
        self.commit(|store| store.create_community(community))
    }

    fn get_community(&self, id: &str) -> Result<Community> {
        self.inner.get_community(id)
    }

    fn update_community(&self, id: &str, community: &Community) -> Result<()> {
        self.commit(|store| store.update_community(id, community))
    }

    fn list_communities(&self) -> Result<Vec<Community>> {
        self.inner.list_communities()
    }
}
