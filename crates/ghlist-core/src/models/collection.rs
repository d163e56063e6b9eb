use serde::{Deserialize, Serialize};

use super::{User, UserProfile};

/// Users and their profiles as last published by the sync layer.
///
/// The two lists are correlated by `login`. `profiles` may be shorter than
/// `users` when some profile fetches failed, so never index one by the
/// position of the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UserCollection {
    pub users: Vec<User>,
    pub profiles: Vec<UserProfile>,
}

impl UserCollection {
    pub fn new(users: Vec<User>, profiles: Vec<UserProfile>) -> Self {
        Self { users, profiles }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.profiles.is_empty()
    }

    pub fn profile(&self, login: &str) -> Option<&UserProfile> {
        self.profiles.iter().find(|p| p.login == login)
    }

    pub fn user(&self, login: &str) -> Option<&User> {
        self.users.iter().find(|u| u.login == login)
    }

    /// Replace the profile with the same login, keeping its position.
    /// Returns false if no profile with that login is present.
    pub fn replace_profile(&mut self, profile: UserProfile) -> bool {
        match self.profiles.iter_mut().find(|p| p.login == profile.login) {
            Some(slot) => {
                *slot = profile;
                true
            }
            None => false,
        }
    }
}
