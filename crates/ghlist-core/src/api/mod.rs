//! REST API client module for the GitHub users API.
//!
//! This module provides the `ApiClient` for fetching the user list,
//! single user profiles, and avatar images, and the `UserSource` trait
//! the sync layer consumes so it can run against a fake in tests.
//!
//! API requests carry a static bearer token when one is configured.

pub mod client;
pub mod error;
pub mod source;

pub use client::{ApiClient, DEFAULT_API_BASE_URL};
pub use error::ApiError;
pub use source::UserSource;
