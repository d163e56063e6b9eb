//! GitHub token lookup.
//!
//! The API token is never compiled in. It comes from the `GITHUB_TOKEN`
//! environment variable (a `.env` file works too) or from the OS keychain
//! via `CredentialStore`.

pub mod credentials;

pub use credentials::{resolve_token, CredentialStore, TOKEN_ENV_VAR};
