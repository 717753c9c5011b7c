//! An open annotation file
//!
//! Bundles the marker store with the file it came from and whether it has
//! been modified since. The unsaved flag is cleared only after a write
//! succeeds.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::codec;
use crate::error::Result;
use crate::store::{FrameRecordStore, SaveStatus};

#[derive(Debug, Clone)]
pub struct AnnotationDocument {
    path: Option<PathBuf>,
    store: FrameRecordStore,
    status: SaveStatus,
}

impl Default for AnnotationDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationDocument {
    /// Empty, untitled document
    #[must_use]
    pub fn new() -> Self {
        let store = FrameRecordStore::new();
        Self {
            path: None,
            status: SaveStatus::new(&store),
            store,
        }
    }

    /// Read a marker file of any generation.
    ///
    /// Older generations are upgraded in memory; the file itself is only
    /// rewritten on the next save.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let store = codec::read_file(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            status: SaveStatus::new(&store),
            store,
        })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn store(&self) -> &FrameRecordStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FrameRecordStore {
        &mut self.store
    }

    /// Replace the whole store, as after importing markers
    pub fn replace_store(&mut self, store: FrameRecordStore) {
        self.store = store;
        self.status = SaveStatus::unsaved();
    }

    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.status.has_unsaved_changes(&self.store)
    }

    /// Write to the current path.
    ///
    /// Returns `Ok(false)` for an untitled document, which needs
    /// [`save_as`](Self::save_as).
    pub fn save(&mut self) -> Result<bool> {
        let Some(path) = self.path.clone() else {
            return Ok(false);
        };
        self.write(&path)?;
        Ok(true)
    }

    /// Write to `path` and make it the current path
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.write(path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn write(&mut self, path: &Path) -> Result<()> {
        codec::write_file(path, &self.store)?;
        self.status.mark_saved(&self.store);
        info!("Document saved to {}", path.display());
        Ok(())
    }
}
