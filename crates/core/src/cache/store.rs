//! On-disk sheet storage.
//!
//! Global-scope sheets live in a flat `tmp/` directory; worksite-scope
//! sheets live under `worksites/{name}/sheets/`. Existence is checked by
//! listing the scope directory and comparing filenames exactly. There is
//! no locking: concurrent writers to the same key race and the last
//! write wins.

use crate::Error;
use std::path::{Path, PathBuf};

/// Where a cached sheet belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Shared flat cache, never expired.
    Global,
    /// Scoped to a worksite; removed with the worksite.
    Worksite(String),
}

/// Directory-backed store for rasterized SDS sheets.
#[derive(Debug, Clone)]
pub struct SheetStore {
    root: PathBuf,
}

impl SheetStore {
    /// Create a store rooted at the configured sheets directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding sheets for the given scope.
    pub fn scope_dir(&self, scope: &Scope) -> PathBuf {
        match scope {
            Scope::Global => self.root.join("tmp"),
            Scope::Worksite(name) => self.root.join("worksites").join(name).join("sheets"),
        }
    }

    /// Whether a sheet is cached under `key`.
    ///
    /// Lists the scope directory and requires an exact filename match;
    /// a missing or unreadable directory reads as "not cached".
    pub async fn exists(&self, key: &str, scope: &Scope) -> bool {
        let dir = self.scope_dir(scope);
        let Ok(mut entries) = tokio::fs::read_dir(&dir).await else {
            return false;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            if entry.file_name().to_string_lossy() == key {
                return true;
            }
        }
        false
    }

    /// Read a cached sheet's bytes.
    pub async fn read(&self, key: &str, scope: &Scope) -> Result<Vec<u8>, Error> {
        let path = self.scope_dir(scope).join(key);
        tokio::fs::read(&path)
            .await
            .map_err(|_| Error::NotFound(format!("{key} is not cached")))
    }

    /// Persist a sheet's bytes under `key`.
    ///
    /// The global cache directory is created on demand; a worksite's
    /// sheets directory must already exist (it is created when the
    /// worksite is created).
    pub async fn write(&self, key: &str, scope: &Scope, bytes: &[u8]) -> Result<(), Error> {
        let dir = self.scope_dir(scope);
        match scope {
            Scope::Global => {
                tokio::fs::create_dir_all(&dir).await?;
            }
            Scope::Worksite(name) => {
                if !dir_exists(&dir).await {
                    return Err(Error::Io(format!("worksite {name} has no sheets directory")));
                }
            }
        }
        tokio::fs::write(dir.join(key), bytes).await?;
        tracing::debug!(key, bytes = bytes.len(), "sheet cached");
        Ok(())
    }
}

async fn dir_exists(path: &Path) -> bool {
    tokio::fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}
