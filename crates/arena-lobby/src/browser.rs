//! Periodically refreshed lobby listing.

use std::sync::Arc;

use arena_protocol::LobbyDescriptor;
use arena_session::AnonymousLogin;
use arena_transport::Connector;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use crate::api::{LobbyApi, RegionDiscovery};
use crate::{BrowserConfig, LobbyRegistryClient};

/// The latest listing and how it was obtained.
#[derive(Debug, Clone, Default)]
pub struct LobbySnapshot {
    /// Last successful listing. Kept when a later refresh fails.
    pub lobbies: Vec<LobbyDescriptor>,
    /// Error of the most recent refresh, cleared by the next success.
    pub last_error: Option<String>,
    /// When the last successful refresh completed.
    pub refreshed_at: Option<Instant>,
    /// Refresh attempts so far, successful or not.
    pub refreshes: u64,
}

/// Keeps a lobby listing fresh in the background.
///
/// Refreshes once on start, then every
/// [`BrowserConfig::refresh_interval_ms`]. Readers observe the listing
/// through a [`watch`] channel. Dropping the browser stops the task.
pub struct LobbyBrowser {
    rx: watch::Receiver<LobbySnapshot>,
    wake: Arc<Notify>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    _guard: DropGuard,
}

impl LobbyBrowser {
    pub fn spawn<L, A, D, C>(
        registry: Arc<LobbyRegistryClient<L, A, D, C>>,
        config: BrowserConfig,
    ) -> Self
    where
        L: LobbyApi,
        A: AnonymousLogin,
        D: RegionDiscovery,
        C: Connector,
    {
        let (tx, rx) = watch::channel(LobbySnapshot::default());
        let wake = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run(
            registry,
            config,
            tx,
            wake.clone(),
            cancel.clone(),
        ));

        Self {
            rx,
            wake,
            _guard: cancel.clone().drop_guard(),
            cancel,
            task,
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> LobbySnapshot {
        self.rx.borrow().clone()
    }

    /// A receiver that is notified after every refresh.
    pub fn subscribe(&self) -> watch::Receiver<LobbySnapshot> {
        self.rx.clone()
    }

    /// Refreshes now instead of waiting for the next interval.
    pub fn refresh(&self) {
        self.wake.notify_one();
    }

    /// Stops refreshing and waits for the task to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

async fn run<L, A, D, C>(
    registry: Arc<LobbyRegistryClient<L, A, D, C>>,
    config: BrowserConfig,
    tx: watch::Sender<LobbySnapshot>,
    wake: Arc<Notify>,
    cancel: CancellationToken,
) where
    L: LobbyApi,
    A: AnonymousLogin,
    D: RegionDiscovery,
    C: Connector,
{
    let mut interval = time::interval(config.refresh_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
            _ = wake.notified() => interval.reset(),
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = registry.list() => result,
        };

        tx.send_modify(|snapshot| {
            snapshot.refreshes += 1;
            match result {
                Ok(lobbies) => {
                    debug!(count = lobbies.len(), "lobby list refreshed");
                    snapshot.lobbies = lobbies;
                    snapshot.last_error = None;
                    snapshot.refreshed_at = Some(Instant::now());
                }
                Err(e) => {
                    warn!(error = %e, "lobby list refresh failed");
                    snapshot.last_error = Some(e.to_string());
                }
            }
        });
    }
    debug!("lobby browser stopped");
}
