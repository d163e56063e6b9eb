/// Where the data published by a sync call came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncSource {
    /// Fetched from the API and written back to the cache
    Remote,
    /// Read from the last cached snapshot
    Cache,
    /// The user list fetch failed; an empty collection was published
    Unavailable,
}

impl std::fmt::Display for SyncSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncSource::Remote => write!(f, "remote"),
            SyncSource::Cache => write!(f, "cache"),
            SyncSource::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Outcome of one sync call. Item failures are listed here for display
/// and logging; they are never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub source: SyncSource,
    pub users: usize,
    pub profiles: usize,
    /// Ids of users whose avatar could not be fetched or saved
    pub failed_avatars: Vec<i64>,
    /// Logins whose profile could not be fetched
    pub failed_profiles: Vec<String>,
}

impl SyncReport {
    pub fn cached(users: usize, profiles: usize) -> Self {
        Self {
            source: SyncSource::Cache,
            users,
            profiles,
            failed_avatars: Vec::new(),
            failed_profiles: Vec::new(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            source: SyncSource::Unavailable,
            users: 0,
            profiles: 0,
            failed_avatars: Vec::new(),
            failed_profiles: Vec::new(),
        }
    }

    /// True when every user got both an avatar and a profile
    pub fn is_complete(&self) -> bool {
        self.source != SyncSource::Unavailable
            && self.failed_avatars.is_empty()
            && self.failed_profiles.is_empty()
    }
}
