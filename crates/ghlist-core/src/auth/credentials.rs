use anyhow::{Context, Result};
use keyring::Entry;
use tracing::debug;

/// Environment variable checked before the keychain
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

const SERVICE_NAME: &str = "ghlist";

/// Keychain account the token is filed under
const TOKEN_ACCOUNT: &str = "github-token";

pub struct CredentialStore;

impl CredentialStore {
    fn entry() -> Result<Entry> {
        Entry::new(SERVICE_NAME, TOKEN_ACCOUNT).context("Failed to create keyring entry")
    }

    /// Store the API token in the OS keychain
    pub fn store_token(token: &str) -> Result<()> {
        Self::entry()?
            .set_password(token)
            .context("Failed to store token in keychain")
    }

    /// Retrieve the API token from the OS keychain
    pub fn get_token() -> Result<String> {
        Self::entry()?
            .get_password()
            .context("Failed to retrieve token from keychain")
    }

    /// Delete the stored API token
    pub fn delete_token() -> Result<()> {
        Self::entry()?
            .delete_credential()
            .context("Failed to delete token from keychain")
    }

    /// Check if a token is stored
    pub fn has_token() -> bool {
        Self::entry().map(|e| e.get_password().is_ok()).unwrap_or(false)
    }
}

/// Resolve the API token: environment first, then keychain.
/// `None` means requests go out unauthenticated.
pub fn resolve_token() -> Option<String> {
    if let Some(token) = non_empty(std::env::var(TOKEN_ENV_VAR).ok()) {
        debug!("Using token from environment");
        return Some(token);
    }

    match CredentialStore::get_token() {
        Ok(token) => non_empty(Some(token)),
        Err(e) => {
            debug!(error = %e, "No token in keychain");
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
