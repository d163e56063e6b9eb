//! Core library for ghlist.
//!
//! Fetches GitHub users with their profiles and avatars, keeps an offline
//! copy on disk, and publishes the result for a front end to render.
//!
//! The entry point is [`SyncOrchestrator`], built from a [`UserSource`]
//! (normally [`ApiClient`]) and a [`LocalStore`] (normally [`CacheManager`]).

pub mod api;
pub mod auth;
pub mod cache;
pub mod codec;
pub mod config;
pub mod connectivity;
pub mod models;
pub mod sync;

pub use api::{ApiClient, ApiError, UserSource};
pub use cache::{CacheManager, LocalStore, SnapshotAge, StorageError};
pub use codec::CodecError;
pub use config::Config;
pub use connectivity::{Connectivity, ConnectivityMonitor};
pub use models::{User, UserCollection, UserProfile};
pub use sync::{SyncOrchestrator, SyncReport, SyncSource};
