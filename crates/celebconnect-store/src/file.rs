//! JSON-file session store.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use fs2::FileExt;
use tracing::{debug, instrument};
use uuid::Uuid;

use celebconnect_core::error::StoreError;
use celebconnect_core::{Result, SessionRecord, SessionStore};

/// Session store persisted as a single JSON document.
///
/// Writes are serialized twice over: a mutex covers threads in this
/// process, and an advisory lock on a sibling `.lock` file covers other
/// processes sharing the same path. Every write lands in a temporary file
/// that is renamed over the target, so readers never see a torn record.
///
/// On Unix the file is created with mode `0600`.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    guard: Mutex<()>,
}

/// Holds the cross-process lock until dropped.
struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

impl FileSessionStore {
    /// Open a store at `path`. The file is created lazily on first write.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            guard: Mutex::new(()),
        }
    }

    /// Path of the session document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn local(&self) -> MutexGuard<'_, ()> {
        self.guard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_exclusive(&self) -> Result<LockGuard> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(StoreError::from)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(StoreError::from)?;
        file.lock_exclusive().map_err(StoreError::from)?;
        Ok(LockGuard { file })
    }

    fn read(&self) -> Result<Option<SessionRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::from(err).into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        let record = serde_json::from_str(&content).map_err(StoreError::from)?;
        Ok(Some(record))
    }

    fn write(&self, record: &SessionRecord) -> Result<()> {
        let content = serde_json::to_string_pretty(record).map_err(StoreError::from)?;

        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("session.json");
        let temp_path = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

        let mut file = create_private(&temp_path).map_err(StoreError::from)?;
        let written = file
            .write_all(content.as_bytes())
            .and_then(|()| file.sync_data())
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(err) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::from(err).into());
        }
        Ok(())
    }
}

#[cfg(unix)]
fn create_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .create_new(true)
        .write(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create_new(true).write(true).open(path)
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<SessionRecord>> {
        let _local = self.local();
        self.read()
    }

    #[instrument(skip(self, record), fields(path = %self.path.display(), role = %record.role))]
    fn set(&self, record: &SessionRecord) -> Result<()> {
        let _local = self.local();
        let _lock = self.lock_exclusive()?;
        self.write(record)?;
        debug!("session saved");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn clear(&self) -> Result<()> {
        let _local = self.local();
        let _lock = self.lock_exclusive()?;
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("session removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::from(err).into()),
        }
    }

    fn update(&self, patch: &dyn Fn(&mut SessionRecord)) -> Result<Option<SessionRecord>> {
        let _local = self.local();
        let _lock = self.lock_exclusive()?;
        let Some(mut record) = self.read()? else {
            return Ok(None);
        };
        patch(&mut record);
        self.write(&record)?;
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use celebconnect_core::Role;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileSessionStore {
        FileSessionStore::open(dir.path().join("nested").join("session.json"))
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.get().unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn record_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let record = SessionRecord::new(Role::Admin).with_field("first_name", "Grace");

        store_in(&dir).set(&record).unwrap();

        let reopened = store_in(&dir);
        assert_eq!(reopened.get().unwrap(), Some(record));
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set(&SessionRecord::new(Role::User)).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();

        assert!(store.get().unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set(&SessionRecord::new(Role::User)).unwrap();
        store.set(&SessionRecord::new(Role::Agent)).unwrap();

        let leftovers: Vec<_> = fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn corrupt_file_is_an_encoding_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        let err = store.get().unwrap_err();
        assert!(matches!(
            err,
            celebconnect_core::Error::Store(StoreError::Encoding { .. })
        ));
    }

    #[test]
    fn update_patches_in_place() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .set(&SessionRecord::new(Role::Agent).with_field("email_verified", false))
            .unwrap();

        store
            .update(&|record: &mut SessionRecord| {
                record.profile.insert("email_verified".to_string(), json!(true));
            })
            .unwrap();

        let stored = store.get().unwrap().unwrap();
        assert_eq!(stored.get("email_verified"), Some(&json!(true)));
        assert_eq!(stored.role, Role::Agent);
    }

    #[cfg(unix)]
    #[test]
    fn file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set(&SessionRecord::new(Role::User)).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn concurrent_updates_are_serialized() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store_in(&dir));
        store
            .set(&SessionRecord::new(Role::User).with_field("count", 0))
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .update(&|record: &mut SessionRecord| {
                            let n = record.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
                            record.profile.insert("count".to_string(), json!(n + 1));
                        })
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = store.get().unwrap().unwrap();
        assert_eq!(stored.get("count"), Some(&json!(8)));
    }
}
