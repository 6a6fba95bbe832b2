// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use isyourday_client::{ApiError, CredentialStore};

/// Credential store persisted as a JSON object in a file.
///
/// The file is read once when the store is opened and rewritten on every
/// change, so the login survives across processes.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`; a missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ApiError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                ApiError::Store(format!("Invalid credential file {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = values.len(), "opened credential store");
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// The file backing this store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), ApiError> {
        let mut values = self
            .values
            .write()
            .map_err(|e| ApiError::Store(e.to_string()))?;
        f(&mut values);
        self.persist(&values)
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        file.write_all(serde_json::to_string_pretty(values)?.as_bytes())?;
        Ok(())
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.read().ok()?;
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.update(|values| {
            values.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use isyourday_client::{Session, Token};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path().join("credentials.json")).unwrap();
        assert_eq!(store.get("access_token"), None);
    }

    #[test]
    fn values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/credentials.json");

        let store = FileStore::open(&path).unwrap();
        store.set("access_token", "abc").unwrap();
        store.set("token_type", "bearer").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("access_token").as_deref(), Some("abc"));
        assert_eq!(reopened.get("token_type").as_deref(), Some("bearer"));

        reopened.remove("access_token").unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("access_token"), None);
    }

    #[test]
    fn session_over_file_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credentials.json");

        let session = Session::new(FileStore::open(&path).unwrap());
        session
            .store_token(&Token {
                access_token: "abc".to_string(),
                token_type: "bearer".to_string(),
            })
            .unwrap();

        let session = Session::new(FileStore::open(&path).unwrap());
        assert_eq!(session.authorization().as_deref(), Some("bearer abc"));

        session.clear().unwrap();
        let session = Session::new(FileStore::open(&path).unwrap());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credentials.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(FileStore::open(&path), Err(ApiError::Store(_))));
    }
}
