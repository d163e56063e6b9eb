//! Data models for GitHub users.
//!
//! - `User`: summary record from the user list endpoint
//! - `UserProfile`: detail record from the single user endpoint
//! - `UserCollection`: the users and profiles published by the sync layer

pub mod collection;
pub mod user;

pub use collection::UserCollection;
pub use user::{avatar_file_name, User, UserProfile};
