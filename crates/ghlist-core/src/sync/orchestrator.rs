use std::sync::Arc;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::{SyncReport, SyncSource};
use crate::api::{ApiError, UserSource};
use crate::cache::{LocalStore, StorageError, USER_LIST_KEY, USER_PROFILE_KEY};
use crate::connectivity::Connectivity;
use crate::models::{User, UserCollection, UserProfile};

/// Default cap on in-flight requests per fan-out round.
/// Limits parallel requests to avoid hitting GitHub's secondary rate limits.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;

#[derive(Error, Debug)]
enum AvatarError {
    #[error(transparent)]
    Fetch(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StorageError),
}

/// Coordinates remote fetches, the local cache and the published collection.
///
/// A connected sync runs two fan-out rounds over the fetched user list:
/// avatars first, then profiles, each fully awaited before the next step.
/// The published `UserCollection` is replaced once per call, after all
/// network and storage work is done.
///
/// Calls on one orchestrator are serialized. A running call is never
/// cancelled by a new one; the new one waits.
pub struct SyncOrchestrator<R, S> {
    source: Arc<R>,
    store: Arc<S>,
    concurrency: usize,
    published: watch::Sender<Arc<UserCollection>>,
    cycle: Mutex<()>,
}

impl<R: UserSource, S: LocalStore> SyncOrchestrator<R, S> {
    pub fn new(source: Arc<R>, store: Arc<S>) -> Self {
        let (published, _) = watch::channel(Arc::new(UserCollection::default()));
        Self {
            source,
            store,
            concurrency: DEFAULT_MAX_CONCURRENT_REQUESTS,
            published,
            cycle: Mutex::new(()),
        }
    }

    /// Set the per-round concurrency cap (at least one)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    // =========================================================================
    // Read access for the presentation layer
    // =========================================================================

    /// Read-only snapshot of the published collection
    pub fn snapshot(&self) -> Arc<UserCollection> {
        Arc::clone(&self.published.borrow())
    }

    /// Receiver notified after every publish
    pub fn subscribe(&self) -> watch::Receiver<Arc<UserCollection>> {
        self.published.subscribe()
    }

    /// Look up a published profile by login
    pub fn lookup_profile(&self, login: &str) -> Option<UserProfile> {
        self.published.borrow().profile(login).cloned()
    }

    /// Cached avatar bytes for a user id
    pub fn avatar(&self, user_id: i64) -> Option<Vec<u8>> {
        self.store.load_image(user_id)
    }

    // =========================================================================
    // Sync
    // =========================================================================

    /// Sync using the current reachability reported by `connectivity`
    pub async fn sync(&self, connectivity: &impl Connectivity) -> SyncReport {
        self.sync_users_and_profiles(connectivity.is_connected()).await
    }

    /// Fetch users and profiles from the API when connected, otherwise load
    /// the last cached snapshot, then publish the result.
    ///
    /// Item failures shrink the result but never abort the call. If the
    /// user list itself cannot be fetched, an empty collection is published
    /// and the cache is left alone; there is no fallback to cached data.
    pub async fn sync_users_and_profiles(&self, connected: bool) -> SyncReport {
        let _cycle = self.cycle.lock().await;

        let (collection, report) = if connected {
            self.load_remote().await
        } else {
            self.load_cached()
        };

        self.published.send_replace(Arc::new(collection));

        info!(
            source = %report.source,
            users = report.users,
            profiles = report.profiles,
            failed_avatars = report.failed_avatars.len(),
            failed_profiles = report.failed_profiles.len(),
            "Sync complete"
        );
        report
    }

    async fn load_remote(&self) -> (UserCollection, SyncReport) {
        let users = match self.source.fetch_user_list().await {
            Ok(users) => users,
            Err(e) => {
                warn!(error = %e, "Failed to fetch user list, publishing empty result");
                return (UserCollection::default(), SyncReport::unavailable());
            }
        };

        let failed_avatars = self.fetch_avatars(&users).await;
        let (profiles, failed_profiles) = self.fetch_profiles(&users).await;

        self.write_snapshot(&users, &profiles);

        let report = SyncReport {
            source: SyncSource::Remote,
            users: users.len(),
            profiles: profiles.len(),
            failed_avatars,
            failed_profiles,
        };
        (UserCollection::new(users, profiles), report)
    }

    fn load_cached(&self) -> (UserCollection, SyncReport) {
        let users: Vec<User> = self.store.load_snapshot(USER_LIST_KEY);
        let profiles: Vec<UserProfile> = self.store.load_snapshot(USER_PROFILE_KEY);
        debug!(users = users.len(), profiles = profiles.len(), "Loaded cached snapshot");

        let report = SyncReport::cached(users.len(), profiles.len());
        (UserCollection::new(users, profiles), report)
    }

    async fn save_avatar(&self, user: &User) -> Result<(), AvatarError> {
        let bytes = self.source.fetch_avatar(&user.avatar_url).await?;
        self.store.save_image(&bytes, &user.avatar_file_name())?;
        Ok(())
    }

    /// First round: fetch and store every avatar. Returns the ids that
    /// failed, in user order.
    async fn fetch_avatars(&self, users: &[User]) -> Vec<i64> {
        let mut outcomes: Vec<(usize, Option<i64>)> = stream::iter(users.iter().enumerate())
            .map(|(index, user)| async move {
                match self.save_avatar(user).await {
                    Ok(()) => (index, None),
                    Err(e) => {
                        debug!(user_id = user.id, error = %e, "Failed to fetch avatar");
                        (index, Some(user.id))
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        outcomes.sort_by_key(|(index, _)| *index);
        let failed: Vec<i64> = outcomes.into_iter().filter_map(|(_, failed)| failed).collect();

        if !failed.is_empty() {
            warn!(user_ids = ?failed, "Failed to fetch images for users");
        }
        failed
    }

    /// Second round: fetch every profile. Failures are left out of the
    /// result; the returned profiles follow user order.
    async fn fetch_profiles(&self, users: &[User]) -> (Vec<UserProfile>, Vec<String>) {
        let mut outcomes: Vec<(usize, &User, Option<UserProfile>)> =
            stream::iter(users.iter().enumerate())
                .map(|(index, user)| async move {
                    let profile = self.source.fetch_profile(&user.login).await;
                    (index, user, profile)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        outcomes.sort_by_key(|(index, _, _)| *index);

        let mut profiles = Vec::with_capacity(outcomes.len());
        let mut failed = Vec::new();
        for (_, user, profile) in outcomes {
            match profile {
                Some(mut profile) => {
                    // Keep the login key even if the body left it out
                    if profile.login.is_empty() {
                        profile.login = user.login.clone();
                    }
                    profiles.push(profile);
                }
                None => failed.push(user.login.clone()),
            }
        }

        if !failed.is_empty() {
            warn!(logins = ?failed, "Failed to fetch profiles for users");
        }
        (profiles, failed)
    }

    fn write_snapshot(&self, users: &[User], profiles: &[UserProfile]) {
        if let Err(e) = self.store.save_snapshot(USER_LIST_KEY, users) {
            warn!(error = %e, "Failed to cache user list");
        }
        if let Err(e) = self.store.save_snapshot(USER_PROFILE_KEY, profiles) {
            warn!(error = %e, "Failed to cache profiles");
        }
    }

    // =========================================================================
    // Single profile refresh
    // =========================================================================

    /// Re-fetch one published profile and replace it in place, then persist
    /// the profile list. Returns true if the profile was replaced.
    ///
    /// Logins that are not published are ignored without a request, and a
    /// failed fetch leaves the published profile as it was.
    pub async fn refresh_single_profile(&self, login: &str) -> bool {
        let _cycle = self.cycle.lock().await;

        if self.published.borrow().profile(login).is_none() {
            debug!(login = %login, "Profile not published, skipping refresh");
            return false;
        }

        let Some(mut profile) = self.source.fetch_profile(login).await else {
            warn!(login = %login, "Profile refresh failed, keeping published profile");
            return false;
        };

        // GitHub logins are case-insensitive; the published key wins
        if !profile.login.is_empty() && !profile.login.eq_ignore_ascii_case(login) {
            warn!(login = %login, returned = %profile.login, "Refresh returned a different user");
            return false;
        }
        profile.login = login.to_string();

        let replaced = self
            .published
            .send_if_modified(|current| Arc::make_mut(current).replace_profile(profile));
        if !replaced {
            return false;
        }

        let profiles = self.published.borrow().profiles.clone();
        if let Err(e) = self.store.save_snapshot(USER_PROFILE_KEY, &profiles) {
            warn!(error = %e, "Failed to cache refreshed profiles");
        }

        info!(login = %login, "Profile refreshed");
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
