use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{LocalStore, StorageError};
use crate::models::avatar_file_name;

const SNAPSHOT_DIR: &str = "snapshots";
const AVATAR_DIR: &str = "avatars";

/// When a snapshot was last written, for "updated 5m ago" style display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotAge {
    pub saved_at: DateTime<Utc>,
}

impl SnapshotAge {
    pub fn new(saved_at: DateTime<Utc>) -> Self {
        Self { saved_at }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.saved_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Includes clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

/// File-backed `LocalStore`.
///
/// Snapshots live in `<cache_dir>/snapshots/<key>.json`, avatars in
/// `<cache_dir>/avatars/`.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self, StorageError> {
        for dir in [cache_dir.join(SNAPSHOT_DIR), cache_dir.join(AVATAR_DIR)] {
            std::fs::create_dir_all(&dir).map_err(|source| StorageError::Write {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Keys and file names become path components, so keep them flat
    fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name != "."
            && name != ".."
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    }

    fn snapshot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !Self::is_valid_name(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.cache_dir.join(SNAPSHOT_DIR).join(format!("{}.json", key)))
    }

    fn image_path(&self, file_name: &str) -> Result<PathBuf, StorageError> {
        if !Self::is_valid_name(file_name) {
            return Err(StorageError::InvalidKey(file_name.to_string()));
        }
        Ok(self.cache_dir.join(AVATAR_DIR).join(file_name))
    }

    /// Write via a temp file and rename so readers never see half a blob
    fn write_replacing(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
        let tmp = path.with_extension("tmp");
        let write_err = |source: std::io::Error| StorageError::Write {
            path: path.to_path_buf(),
            source,
        };
        std::fs::write(&tmp, bytes).map_err(write_err)?;
        std::fs::rename(&tmp, path).map_err(write_err)
    }

    /// Last write time of a snapshot, `None` if it was never written
    pub fn snapshot_age(&self, key: &str) -> Option<SnapshotAge> {
        let path = self.snapshot_path(key).ok()?;
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
        Some(SnapshotAge::new(DateTime::<Utc>::from(modified)))
    }
}

impl LocalStore for CacheManager {
    fn write_blob(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.snapshot_path(key)?;
        Self::write_replacing(&path, bytes)?;
        debug!(key = key, bytes = bytes.len(), "Snapshot written");
        Ok(())
    }

    fn read_blob(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.snapshot_path(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn save_image(&self, bytes: &[u8], file_name: &str) -> Result<(), StorageError> {
        let path = self.image_path(file_name)?;
        Self::write_replacing(&path, bytes)
    }

    fn load_image(&self, user_id: i64) -> Option<Vec<u8>> {
        let path = self.image_path(&avatar_file_name(user_id)).ok()?;
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!(user_id = user_id, error = %e, "Avatar not available on disk");
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
