//! Config document storage.
//!
//! A [`DocumentStore`] loads and overwrites whole documents. There is no
//! caching: every read and write goes to the backing storage, which stays the
//! single source of truth.

mod document;
mod file;
mod memory;

pub use document::ConfigDocument;
pub use file::YamlFileStore;
pub use memory::MemoryStore;

use crate::errors::StoreError;
use std::path::Path;

/// Loads and persists config documents.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentStore: Send + Sync {
    /// Loads the document at `path`.
    ///
    /// Returns `Ok(None)` if the file is absent or holds no document. An
    /// explicit empty mapping is returned as an empty document.
    fn load(&self, path: &Path) -> Result<Option<ConfigDocument>, StoreError>;

    /// Overwrites the document at `path`, creating parent directories.
    fn save(&self, path: &Path, document: &ConfigDocument) -> Result<(), StoreError>;

    /// True if `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;
}
