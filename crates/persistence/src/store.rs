//! Snapshot stores.

use crate::document::TimelineDocument;
use crate::error::{PersistenceError, Result};
use crate::snapshot;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File extension of a live snapshot.
pub const SNAPSHOT_EXT: &str = "geot";

/// Load/save boundary for per-identity timeline state.
pub trait SnapshotStore: Send + Sync {
    /// Returns `None` when nothing was ever saved for `identity`.
    fn load(&self, identity: &str) -> Result<Option<TimelineDocument>>;
    fn save(&self, identity: &str, doc: &TimelineDocument) -> Result<()>;
    /// Identities with a saved snapshot.
    fn identities(&self) -> Result<Vec<String>>;
}

/// One snapshot file per identity under a directory.
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, identity: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", identity, SNAPSHOT_EXT))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, identity: &str) -> Result<Option<TimelineDocument>> {
        let path = self.path_for(identity);
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let (_, doc) = snapshot::decode(&bytes)?;
        if doc.identity != identity {
            return Err(PersistenceError::InvalidFormat(format!(
                "snapshot {:?} belongs to {:?}",
                path, doc.identity
            )));
        }
        Ok(Some(doc))
    }

    fn save(&self, identity: &str, doc: &TimelineDocument) -> Result<()> {
        snapshot::write_to(self.path_for(identity), doc)
    }

    fn identities(&self) -> Result<Vec<String>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SNAPSHOT_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                out.push(stem.to_string());
            }
        }
        out.sort();
        Ok(out)
    }
}

/// In-process store. Nothing survives the process.
#[derive(Default)]
pub struct MemorySnapshotStore {
    docs: Mutex<HashMap<String, TimelineDocument>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(docs: impl IntoIterator<Item = TimelineDocument>) -> Self {
        let map = docs.into_iter().map(|d| (d.identity.clone(), d)).collect();
        Self { docs: Mutex::new(map) }
    }

    pub fn len(&self) -> usize {
        self.docs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.lock().is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, identity: &str) -> Result<Option<TimelineDocument>> {
        Ok(self.docs.lock().get(identity).cloned())
    }

    fn save(&self, identity: &str, doc: &TimelineDocument) -> Result<()> {
        self.docs.lock().insert(identity.to_string(), doc.clone());
        Ok(())
    }

    fn identities(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.docs.lock().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
