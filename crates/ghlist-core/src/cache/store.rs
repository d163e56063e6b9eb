use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use super::StorageError;
use crate::codec;

/// Snapshot key for the user list
pub const USER_LIST_KEY: &str = "UserList";

/// Snapshot key for the profile list
pub const USER_PROFILE_KEY: &str = "UserProfile";

/// Persistent storage for snapshots and avatar images.
///
/// Implementations only move bytes; the typed snapshot helpers are provided
/// on top. No locking happens at this layer, the last write to a key wins.
pub trait LocalStore: Send + Sync {
    /// Overwrite the blob stored under `key`
    fn write_blob(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Read the blob stored under `key`, `Ok(None)` if there is none
    fn read_blob(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Write image bytes, replacing any existing file of the same name
    fn save_image(&self, bytes: &[u8], file_name: &str) -> Result<(), StorageError>;

    /// Avatar bytes for a user id, `None` on any failure
    fn load_image(&self, user_id: i64) -> Option<Vec<u8>>;

    fn save_snapshot<T>(&self, key: &str, value: &T) -> Result<(), StorageError>
    where
        Self: Sized,
        T: Serialize + ?Sized,
    {
        let bytes = codec::encode(value)?;
        self.write_blob(key, &bytes)
    }

    /// Load a list snapshot. Missing, unreadable and undecodable snapshots
    /// all come back empty.
    fn load_snapshot<T>(&self, key: &str) -> Vec<T>
    where
        Self: Sized,
        T: DeserializeOwned,
    {
        let bytes = match self.read_blob(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = key, error = %e, "Failed to read snapshot");
                return Vec::new();
            }
        };

        codec::decode(&bytes).unwrap_or_else(|e| {
            warn!(key = key, error = %e, "Failed to decode snapshot");
            Vec::new()
        })
    }
}
