//! Data synchronization between the GitHub API, the local cache and the
//! collection published to the presentation layer.
//!
//! `SyncOrchestrator` owns the published `UserCollection`. Readers take
//! snapshots or subscribe; only the orchestrator writes.

pub mod orchestrator;
pub mod report;

pub use orchestrator::SyncOrchestrator;
pub use report::{SyncReport, SyncSource};
