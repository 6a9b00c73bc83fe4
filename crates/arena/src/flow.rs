//! The client-facing flows: host a new room, or join an existing one.
//!
//! ```text
//! host:  token → region race → create lobby → poll until ready
//! join:                                       poll until ready
//! ```
//!
//! Once a flow returns a [`ReadyRoom`], the real-time transport connects to
//! its address; that part lives outside this crate.

use std::sync::Arc;

use arena_lobby::{
    BrowserConfig, ConnectionBootstrapPoller, HttpLobbyClient, LobbyApi, LobbyBrowser,
    LobbyRegistryClient, RegionDiscovery, RegionSelector, RoomInfoApi,
};
use arena_protocol::{ConnectionInfo, LobbyConfig, LobbyId};
use arena_room::RoomManager;
use arena_session::{AnonymousLogin, HttpAuthClient, SessionTokenCache};
use arena_transport::{Connector, WebSocketConnector};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{ArenaConfig, ArenaError};

/// A room that is up and accepting connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyRoom {
    pub lobby_id: LobbyId,
    pub connection: ConnectionInfo,
}

/// The production flow: HTTP directory, HTTP auth, WebSocket probes.
pub type HttpHostFlow =
    HostFlow<HttpLobbyClient, HttpAuthClient, HttpLobbyClient, WebSocketConnector>;

/// Drives lobby creation and room bootstrap for one player session.
pub struct HostFlow<L, A: AnonymousLogin, D, C> {
    registry: Arc<LobbyRegistryClient<L, A, D, C>>,
    poller: ConnectionBootstrapPoller<L>,
    browser: BrowserConfig,
}

impl HttpHostFlow {
    /// Wires the HTTP clients from `config`. One connection pool is shared
    /// by auth, discovery, the directory and connection-info requests.
    pub fn from_config(config: &ArenaConfig) -> Result<Self, ArenaError> {
        let endpoint = config.endpoint.clone();
        let http = endpoint.http_client().map_err(arena_lobby::RegistryError::from)?;

        let directory = HttpLobbyClient::with_client(http.clone(), endpoint.clone());
        let auth = HttpAuthClient::with_client(http, endpoint.clone());
        let tokens = Arc::new(SessionTokenCache::new(auth, endpoint.app_id.clone()));
        let regions = RegionSelector::new(
            directory.clone(),
            WebSocketConnector,
            config.region.clone(),
        );
        let registry =
            LobbyRegistryClient::new(directory.clone(), tokens, regions, config.registry());

        Ok(Self {
            registry: Arc::new(registry),
            poller: ConnectionBootstrapPoller::new(directory, config.poll.clone()),
            browser: config.browser.clone(),
        })
    }
}

impl<L, A, D, C> HostFlow<L, A, D, C>
where
    L: LobbyApi + RoomInfoApi,
    A: AnonymousLogin,
    D: RegionDiscovery,
    C: Connector,
{
    pub fn new(
        registry: Arc<LobbyRegistryClient<L, A, D, C>>,
        poller: ConnectionBootstrapPoller<L>,
        browser: BrowserConfig,
    ) -> Self {
        Self {
            registry,
            poller,
            browser,
        }
    }

    pub fn registry(&self) -> &Arc<LobbyRegistryClient<L, A, D, C>> {
        &self.registry
    }

    /// Creates a lobby (once per session) and waits for its room.
    ///
    /// # Errors
    /// - [`ArenaError::Session`], [`ArenaError::Region`],
    ///   [`ArenaError::Registry`] — lobby creation failed
    /// - [`ArenaError::Poll`] — the room never left `starting`
    /// - [`ArenaError::RoomStartFailed`] — the room reported `error`
    pub async fn create_and_connect(
        &self,
        config: LobbyConfig,
        cancel: &CancellationToken,
    ) -> Result<ReadyRoom, ArenaError> {
        let lobby_id = self.registry.create(config).await?;
        self.join(&lobby_id, cancel).await
    }

    /// Waits for an existing lobby's room to be ready.
    pub async fn join(
        &self,
        lobby_id: &LobbyId,
        cancel: &CancellationToken,
    ) -> Result<ReadyRoom, ArenaError> {
        let connection = self.poller.poll_until_ready(lobby_id, cancel).await?;
        if !connection.is_ready() {
            warn!(%lobby_id, "room reported an error while starting");
            return Err(ArenaError::RoomStartFailed(lobby_id.clone()));
        }

        let address = connection.address().unwrap_or_default();
        info!(%lobby_id, %address, "room ready");
        Ok(ReadyRoom {
            lobby_id: lobby_id.clone(),
            connection,
        })
    }

    /// Starts a background lobby listing.
    pub fn browse(&self) -> LobbyBrowser {
        LobbyBrowser::spawn(self.registry.clone(), self.browser.clone())
    }
}

/// Room-side wiring: a [`RoomManager`] that mirrors occupancy to the HTTP
/// directory with the developer credential.
pub fn room_manager(config: &ArenaConfig) -> Result<RoomManager<HttpLobbyClient>, ArenaError> {
    if config.endpoint.developer_token.is_none() {
        return Err(ArenaError::Config(
            "developer token is required on the room side".into(),
        ));
    }
    let directory = HttpLobbyClient::new(config.endpoint.clone())?;
    Ok(RoomManager::new(Arc::new(directory), config.room.clone()))
}
