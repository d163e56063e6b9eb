//! Network reachability signal.
//!
//! The sync layer only needs a yes/no answer at the start of a cycle, so it
//! takes anything implementing `Connectivity`. `ConnectivityMonitor` is the
//! process-wide implementation: a latest-value-only flag that can be set
//! directly or kept current by a background TCP probe.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Host the default probe connects to
pub const DEFAULT_PROBE_ADDRESS: &str = "api.github.com:443";

/// Connect timeout for a single probe.
/// 3s is long enough for a slow mobile link without stalling startup.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3000;

pub trait Connectivity: Send + Sync {
    fn is_connected(&self) -> bool;
}

#[derive(Clone)]
pub struct ConnectivityMonitor {
    state: Arc<watch::Sender<bool>>,
    probe_address: Arc<str>,
    probe_timeout: Duration,
}

impl ConnectivityMonitor {
    /// Create a monitor with a known starting state and the default probe
    pub fn new(initial: bool) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state: Arc::new(state),
            probe_address: Arc::from(DEFAULT_PROBE_ADDRESS),
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
        }
    }

    /// Point the probe at a different `host:port`
    pub fn with_probe(mut self, address: &str, timeout: Duration) -> Self {
        self.probe_address = Arc::from(address);
        self.probe_timeout = timeout;
        self
    }

    /// Record the current reachability. Returns true if the value changed.
    pub fn set(&self, connected: bool) -> bool {
        let changed = self.state.send_if_modified(|current| {
            if *current == connected {
                false
            } else {
                *current = connected;
                true
            }
        });
        if changed {
            info!(connected = connected, "Connectivity changed");
        }
        changed
    }

    /// Receiver that observes only the latest value
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Probe once and record the result
    pub async fn probe_once(&self) -> bool {
        let reachable = probe(&self.probe_address, self.probe_timeout).await;
        self.set(reachable);
        reachable
    }

    /// Re-probe on a fixed interval until the handle is aborted.
    /// Only the flag is updated; nothing is synced from here.
    pub fn spawn_probe(&self, interval: Duration) -> JoinHandle<()> {
        let monitor = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                monitor.probe_once().await;
            }
        })
    }
}

impl Connectivity for ConnectivityMonitor {
    fn is_connected(&self) -> bool {
        *self.state.borrow()
    }
}

async fn probe(address: &str, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, TcpStream::connect(address)).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            debug!(address = address, error = %e, "Probe connect failed");
            false
        }
        Err(_) => {
            debug!(address = address, "Probe timed out");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn test_set_reports_changes_only() {
        let monitor = ConnectivityMonitor::new(false);
        assert!(!monitor.is_connected());
        assert!(monitor.set(true));
        assert!(!monitor.set(true));
        assert!(monitor.is_connected());
    }

    #[tokio::test]
    async fn test_subscriber_sees_latest_value() {
        let monitor = ConnectivityMonitor::new(true);
        let mut rx = monitor.subscribe();

        monitor.set(false);
        monitor.set(true);
        monitor.set(false);

        rx.changed().await.unwrap();
        assert!(!*rx.borrow_and_update());
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_probe_reachable_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let monitor = ConnectivityMonitor::new(false).with_probe(&addr, Duration::from_secs(2));
        assert!(monitor.probe_once().await);
        assert!(monitor.is_connected());
    }

    #[tokio::test]
    async fn test_probe_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let monitor = ConnectivityMonitor::new(true).with_probe(&addr, Duration::from_secs(2));
        assert!(!monitor.probe_once().await);
        assert!(!monitor.is_connected());
    }

    #[tokio::test]
    async fn test_spawned_probe_updates_flag() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let monitor = ConnectivityMonitor::new(false).with_probe(&addr, Duration::from_secs(2));
        let mut rx = monitor.subscribe();
        let handle = monitor.spawn_probe(Duration::from_millis(50));

        rx.changed().await.unwrap();
        assert!(*rx.borrow());
        handle.abort();
    }
}
