//! Static assets for the documentation UI.
//!
//! Assets are looked up by file name under a single root directory. Names
//! are resolved through the filesystem and rejected when the canonical path
//! leaves the root, so `../` segments and symlinks out of the root never
//! reach the disk read.

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::{trace, warn};

use crate::error::{DocsError, DocsResult};

/// Read-only view of a directory of UI assets.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    root: PathBuf,
}

impl StaticAssets {
    /// Serve assets from `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Assets shipped with this crate (`ui.html`, `ui.css`).
    #[must_use]
    pub fn bundled() -> Self {
        Self::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
    }

    /// The asset root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` to a file inside the root.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::PathEscapesRoot`] when the resolved path is
    /// outside the root and [`DocsError::AssetNotFound`] when no regular
    /// file exists at it.
    pub fn resolve(&self, name: &str) -> DocsResult<PathBuf> {
        let not_found = || DocsError::AssetNotFound { name: name.to_string() };

        let root = self.root.canonicalize().map_err(|_| not_found())?;
        let candidate = root.join(name).canonicalize().map_err(|_| not_found())?;

        if !candidate.starts_with(&root) {
            warn!(name, root = %root.display(), "asset path escapes static root");
            return Err(DocsError::PathEscapesRoot { name: name.to_string() });
        }
        if !candidate.is_file() {
            return Err(not_found());
        }
        Ok(candidate)
    }

    /// Read the contents of `name`.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve); read failures surface as
    /// [`DocsError::IoError`].
    pub fn load(&self, name: &str) -> DocsResult<Bytes> {
        let path = self.resolve(name)?;
        let contents = fs::read(&path)?;
        trace!(name, size = contents.len(), "asset loaded");
        Ok(Bytes::from(contents))
    }

    /// Read `name` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load). Invalid UTF-8 is reported as
    /// [`DocsError::IoError`].
    pub fn load_text(&self, name: &str) -> DocsResult<String> {
        let path = self.resolve(name)?;
        Ok(fs::read_to_string(path)?)
    }
}

impl Default for StaticAssets {
    fn default() -> Self {
        Self::bundled()
    }
}
