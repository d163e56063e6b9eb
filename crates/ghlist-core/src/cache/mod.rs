//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for storing the last fetched
//! user list and profiles as JSON snapshots, and avatar images as one file
//! per user id. Snapshots are overwritten wholesale on each online sync.
//!
//! Cached data:
//! - `UserList` and `UserProfile` snapshots
//! - `avatar_<id>.jpg` images

pub mod error;
pub mod manager;
pub mod store;

pub use error::StorageError;
pub use manager::{CacheManager, SnapshotAge};
pub use store::{LocalStore, USER_LIST_KEY, USER_PROFILE_KEY};
