//! Wiring between the core services and the commands.
//!
//! `App` builds the API client, cache and sync orchestrator from the
//! configuration and implements each subcommand on top of them.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use ghlist_core::auth::{resolve_token, CredentialStore, TOKEN_ENV_VAR};
use ghlist_core::cache::{USER_LIST_KEY, USER_PROFILE_KEY};
use ghlist_core::{
    ApiClient, CacheManager, Config, Connectivity, ConnectivityMonitor, SyncOrchestrator,
};

use crate::render;

pub struct App {
    pub config: Config,
    pub cache: Arc<CacheManager>,
    pub sync: SyncOrchestrator<ApiClient, CacheManager>,
    pub connectivity: ConnectivityMonitor,
    has_token: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let cache_dir = config.cache_dir()?;
        let cache = Arc::new(
            CacheManager::new(cache_dir).context("Failed to open cache directory")?,
        );

        let mut api = ApiClient::with_options(&config.api_base_url, config.request_timeout())
            .context("Failed to build HTTP client")?;
        let has_token = match resolve_token() {
            Some(token) => {
                api.set_token(token);
                true
            }
            None => {
                warn!("No GitHub token configured; requests are unauthenticated and heavily rate limited");
                false
            }
        };

        let sync = SyncOrchestrator::new(Arc::new(api), Arc::clone(&cache))
            .with_concurrency(config.concurrency());

        let connectivity = ConnectivityMonitor::new(false)
            .with_probe(&config.probe_address, config.probe_timeout());

        Ok(Self {
            config,
            cache,
            sync,
            connectivity,
            has_token,
        })
    }

    /// Load the offline copy into the orchestrator without touching the network
    async fn load_cached(&self) {
        self.sync.sync_users_and_profiles(false).await;
    }

    // =========================================================================
    // Commands
    // =========================================================================

    pub async fn run_sync(&self, offline: bool) -> Result<()> {
        if !offline && !self.connectivity.probe_once().await {
            info!("Network unreachable, using offline data");
        }

        let report = self.sync.sync(&self.connectivity).await;
        let collection = self.sync.snapshot();

        if !collection.users.is_empty() {
            print!(
                "{}",
                render::users_table(&collection, |id| self.sync.avatar(id).is_some())
            );
        }
        println!("{}", render::report_line(&report));
        Ok(())
    }

    pub async fn show(&self, login: &str) -> Result<()> {
        self.load_cached().await;
        let collection = self.sync.snapshot();
        match self.sync.lookup_profile(login) {
            Some(profile) => {
                print!("{}", render::profile_detail(&profile, collection.user(login)));
                Ok(())
            }
            None => bail!("Profile could not be found: {}", login),
        }
    }

    pub async fn refresh(&self, login: &str) -> Result<()> {
        self.load_cached().await;
        if self.sync.lookup_profile(login).is_none() {
            bail!("Profile could not be found: {}", login);
        }

        if !self.connectivity.probe_once().await {
            bail!("GitHub is unreachable; cannot refresh {}", login);
        }

        if !self.sync.refresh_single_profile(login).await {
            warn!(login = %login, "Refresh did not update the profile");
        }

        let collection = self.sync.snapshot();
        let profile = collection
            .profile(login)
            .with_context(|| format!("Profile could not be found: {}", login))?;
        print!("{}", render::profile_detail(profile, collection.user(login)));
        Ok(())
    }

    pub fn write_avatar(&self, user_id: i64, out: &Path) -> Result<()> {
        let bytes = self
            .sync
            .avatar(user_id)
            .with_context(|| format!("No cached avatar for user {}", user_id))?;
        std::fs::write(out, &bytes)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        println!("Wrote {} bytes to {}", bytes.len(), out.display());
        Ok(())
    }

    pub async fn status(&self) -> Result<()> {
        let age = |key: &str| {
            self.cache
                .snapshot_age(key)
                .map(|a| a.age_display())
                .unwrap_or_else(|| "never".to_string())
        };
        let online = self.connectivity.probe_once().await;

        println!("Cache:     {}", self.cache.cache_dir().display());
        println!("API:       {}", self.config.api_base_url);
        println!("Users:     updated {}", age(USER_LIST_KEY));
        println!("Profiles:  updated {}", age(USER_PROFILE_KEY));
        println!(
            "Token:     {}",
            if self.has_token { "configured" } else { "missing" }
        );
        println!("Network:   {}", if online { "online" } else { "offline" });
        Ok(())
    }

    /// Print reachability transitions until the process is interrupted
    pub async fn watch_network(&self, interval: Duration) -> Result<()> {
        let mut rx = self.connectivity.subscribe();
        let probe = self.connectivity.spawn_probe(interval);

        loop {
            let online = *rx.borrow_and_update();
            println!("{}", if online { "online" } else { "offline" });
            if rx.changed().await.is_err() {
                break;
            }
        }

        probe.abort();
        Ok(())
    }
}

/// Store a token in the keychain, prompting without echo
pub fn set_token() -> Result<()> {
    let token = rpassword::prompt_password("GitHub token: ").context("Failed to read token")?;
    let token = token.trim();
    if token.is_empty() {
        bail!("Empty token, nothing stored");
    }
    CredentialStore::store_token(token)?;
    println!("Token stored in the system keychain");
    if std::env::var_os(TOKEN_ENV_VAR).is_some() {
        println!("Note: {} is set and takes precedence", TOKEN_ENV_VAR);
    }
    Ok(())
}

pub fn clear_token() -> Result<()> {
    if !CredentialStore::has_token() {
        println!("No stored token");
        return Ok(());
    }
    CredentialStore::delete_token()?;
    println!("Token removed");
    Ok(())
}
