use serde::{Deserialize, Serialize};

use crate::codec::null_as_default;

/// A user as listed by `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct User {
    pub login: String,
    pub id: i64,
    pub avatar_url: String,
    #[serde(rename = "html_url")]
    pub profile_url: String,
}

impl User {
    /// File name the avatar for this user is stored under
    pub fn avatar_file_name(&self) -> String {
        avatar_file_name(self.id)
    }
}

/// Avatar images are keyed by user id only, so they can be loaded
/// without the rest of the collection.
pub fn avatar_file_name(user_id: i64) -> String {
    format!("avatar_{}.jpg", user_id)
}

/// Profile detail from `GET /users/{login}`.
///
/// Every field falls back to an empty string or zero when the API omits it
/// or sends `null`, so a sparse profile still decodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UserProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub login: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bio: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_repos: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_gists: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub followers: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub following: i64,
}

impl UserProfile {
    /// Name to show in lists, falling back to the login
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.login
        } else {
            &self.name
        }
    }
}
