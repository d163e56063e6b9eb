use async_trait::async_trait;

use super::ApiError;
use crate::models::{User, UserProfile};

/// Remote source of users, profiles and avatars.
///
/// `ApiClient` is the production implementation. Profile lookups are
/// recoverable by contract: any failure comes back as `None`.
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Fetch the default page of users. An undecodable body yields an
    /// empty list; transport and HTTP failures are errors.
    async fn fetch_user_list(&self) -> Result<Vec<User>, ApiError>;

    /// Fetch one profile by login, `None` on any failure
    async fn fetch_profile(&self, login: &str) -> Option<UserProfile>;

    /// Fetch raw avatar image bytes
    async fn fetch_avatar(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}
