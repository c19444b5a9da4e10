//! Worksite records and their on-disk JSON store.
//!
//! Each worksite owns a directory under `worksites/` holding a
//! `{name}-worksite.json` metadata file and a `sheets/` subdirectory for
//! its cached SDS sheets. Metadata updates are plain read-modify-write
//! with no optimistic concurrency: concurrent updates to the same
//! worksite can lose writes.

use crate::{Error, SdsProduct};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A worksite record, serialized exactly as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worksite {
    pub worksite_name: String,
    pub worksite_addr: String,
    pub worksite_proc: String,
    #[serde(default)]
    pub worksite_users: Vec<String>,
    #[serde(default, rename = "worksiteSDS")]
    pub worksite_sds: Vec<SdsProduct>,
}

impl Worksite {
    /// Reject records missing required fields.
    ///
    /// Users may be empty (membership is managed after creation); the
    /// SDS list may not.
    pub fn validate(&self) -> Result<(), Error> {
        if self.worksite_name.trim().is_empty() {
            return Err(Error::Validation("worksiteName".into()));
        }
        if self.worksite_addr.trim().is_empty() {
            return Err(Error::Validation("worksiteAddr".into()));
        }
        if self.worksite_proc.trim().is_empty() {
            return Err(Error::Validation("worksiteProc".into()));
        }
        if self.worksite_sds.is_empty() {
            return Err(Error::Validation("worksiteSDS".into()));
        }
        Ok(())
    }
}

/// JSON-file-backed store for worksite records.
#[derive(Debug, Clone)]
pub struct WorksiteStore {
    root: PathBuf,
}

impl WorksiteStore {
    /// Create a store rooted at the configured sheets directory.
    ///
    /// Worksites live under `{root}/worksites`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn worksites_dir(&self) -> PathBuf {
        self.root.join("worksites")
    }

    fn worksite_dir(&self, name: &str) -> PathBuf {
        self.worksites_dir().join(name)
    }

    fn meta_path(&self, name: &str) -> PathBuf {
        self.worksite_dir(name).join(format!("{name}-worksite.json"))
    }

    /// Whether a worksite directory exists.
    pub async fn contains(&self, name: &str) -> bool {
        tokio::fs::metadata(self.worksite_dir(name))
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// Create a worksite: its directory, sheets subdirectory, and metadata.
    pub async fn create(&self, worksite: &Worksite) -> Result<(), Error> {
        worksite.validate()?;
        let name = &worksite.worksite_name;
        if self.contains(name).await {
            return Err(Error::Conflict(format!("worksite {name} already exists")));
        }
        tokio::fs::create_dir_all(self.worksite_dir(name).join("sheets")).await?;
        self.save(worksite).await?;
        tracing::info!(worksite = %name, "worksite created");
        Ok(())
    }

    /// Load a worksite's metadata.
    pub async fn load(&self, name: &str) -> Result<Worksite, Error> {
        let raw = tokio::fs::read(self.meta_path(name))
            .await
            .map_err(|_| Error::NotFound(format!("worksite {name}")))?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Write a worksite's metadata. The worksite directory must exist.
    pub async fn save(&self, worksite: &Worksite) -> Result<(), Error> {
        let name = &worksite.worksite_name;
        if !self.contains(name).await {
            return Err(Error::NotFound(format!("worksite {name}")));
        }
        let json = serde_json::to_vec(worksite)?;
        tokio::fs::write(self.meta_path(name), json).await?;
        Ok(())
    }

    /// Delete a worksite and everything under it, cached sheets included.
    pub async fn delete(&self, name: &str) -> Result<(), Error> {
        if !self.contains(name).await {
            return Err(Error::NotFound(format!("worksite {name}")));
        }
        tokio::fs::remove_dir_all(self.worksite_dir(name)).await?;
        tracing::info!(worksite = %name, "worksite removed");
        Ok(())
    }

    /// Add a user to a worksite's membership list.
    pub async fn add_user(&self, name: &str, email: &str) -> Result<(), Error> {
        let mut worksite = self.load(name).await?;
        if worksite.worksite_users.iter().any(|u| u == email) {
            return Err(Error::Conflict(format!("{email} already in {name}")));
        }
        worksite.worksite_users.push(email.to_string());
        self.save(&worksite).await
    }

    /// Remove a user from a worksite's membership list.
    pub async fn remove_user(&self, name: &str, email: &str) -> Result<(), Error> {
        let mut worksite = self.load(name).await?;
        let Some(index) = worksite.worksite_users.iter().position(|u| u == email) else {
            return Err(Error::NotFound(format!("{email} is not a user in {name}")));
        };
        worksite.worksite_users.remove(index);
        self.save(&worksite).await
    }

    /// Names of all worksites the given user belongs to.
    ///
    /// Scans every worksite's metadata; unreadable entries are skipped.
    pub async fn worksites_for_user(&self, email: &str) -> Result<Vec<String>, Error> {
        let mut names = Vec::new();
        let Ok(mut entries) = tokio::fs::read_dir(self.worksites_dir()).await else {
            return Ok(names);
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name().to_string_lossy().into_owned();
            match self.load(&name).await {
                Ok(worksite) => {
                    if worksite.worksite_users.iter().any(|u| u == email) {
                        names.push(name);
                    }
                }
                Err(e) => {
                    tracing::debug!(worksite = %name, error = %e, "skipping unreadable worksite");
                }
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn worksite(name: &str) -> Worksite {
        Worksite {
            worksite_name: name.into(),
            worksite_addr: "12 Dock Rd".into(),
            worksite_proc: "Standard intake procedure".into(),
            worksite_users: vec![],
            worksite_sds: vec![SdsProduct {
                name: "Bleach".into(),
                manufacturer: "Clorox".into(),
                url: "https://example.com/sheet/1".into(),
            }],
        }
    }

    fn store() -> (TempDir, WorksiteStore) {
        let tmp = TempDir::new().unwrap();
        let store = WorksiteStore::new(tmp.path());
        (tmp, store)
    }

    #[tokio::test]
    async fn test_create_and_load() {
        let (_tmp, store) = store();
        store.create(&worksite("plant-a")).await.unwrap();
        let loaded = store.load("plant-a").await.unwrap();
        assert_eq!(loaded, worksite("plant-a"));
    }

    #[tokio::test]
    async fn test_create_makes_sheets_dir() {
        let (tmp, store) = store();
        store.create(&worksite("plant-a")).await.unwrap();
        assert!(tmp.path().join("worksites/plant-a/sheets").is_dir());
    }

    #[tokio::test]
    async fn test_create_duplicate_conflicts() {
        let (_tmp, store) = store();
        store.create(&worksite("plant-a")).await.unwrap();
        let err = store.create(&worksite("plant-a")).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_sds_list() {
        let (_tmp, store) = store();
        let mut w = worksite("plant-a");
        w.worksite_sds.clear();
        let err = store.create(&w).await.unwrap_err();
        assert!(matches!(err, Error::Validation(field) if field == "worksiteSDS"));
    }

    #[tokio::test]
    async fn test_save_missing_worksite() {
        let (_tmp, store) = store();
        let err = store.save(&worksite("ghost")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_everything() {
        let (tmp, store) = store();
        store.create(&worksite("plant-a")).await.unwrap();
        tokio::fs::write(tmp.path().join("worksites/plant-a/sheets/a_b.png"), b"x")
            .await
            .unwrap();
        store.delete("plant-a").await.unwrap();
        assert!(!store.contains("plant-a").await);
        assert!(matches!(store.load("plant-a").await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (_tmp, store) = store();
        assert!(matches!(store.delete("ghost").await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_and_remove_user() {
        let (_tmp, store) = store();
        store.create(&worksite("plant-a")).await.unwrap();
        store.add_user("plant-a", "worker@example.com").await.unwrap();
        let loaded = store.load("plant-a").await.unwrap();
        assert_eq!(loaded.worksite_users, vec!["worker@example.com"]);

        store.remove_user("plant-a", "worker@example.com").await.unwrap();
        let loaded = store.load("plant-a").await.unwrap();
        assert!(loaded.worksite_users.is_empty());
    }

    #[tokio::test]
    async fn test_add_user_twice_conflicts() {
        let (_tmp, store) = store();
        store.create(&worksite("plant-a")).await.unwrap();
        store.add_user("plant-a", "worker@example.com").await.unwrap();
        let err = store.add_user("plant-a", "worker@example.com").await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_remove_absent_user() {
        let (_tmp, store) = store();
        store.create(&worksite("plant-a")).await.unwrap();
        let err = store.remove_user("plant-a", "ghost@example.com").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_worksites_for_user() {
        let (_tmp, store) = store();
        store.create(&worksite("plant-a")).await.unwrap();
        store.create(&worksite("plant-b")).await.unwrap();
        store.add_user("plant-a", "worker@example.com").await.unwrap();

        let mine = store.worksites_for_user("worker@example.com").await.unwrap();
        assert_eq!(mine, vec!["plant-a"]);

        let none = store.worksites_for_user("other@example.com").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_worksites_for_user_no_directory() {
        let (_tmp, store) = store();
        let names = store.worksites_for_user("worker@example.com").await.unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn test_metadata_json_shape() {
        let json = serde_json::to_value(worksite("plant-a")).unwrap();
        assert!(json.get("worksiteName").is_some());
        assert!(json.get("worksiteAddr").is_some());
        assert!(json.get("worksiteProc").is_some());
        assert!(json.get("worksiteUsers").is_some());
        assert!(json.get("worksiteSDS").is_some());
    }
}
