//! Lobby creation and listing.

use std::sync::Arc;

use arena_protocol::{CreateLobbyRequest, LobbyConfig, LobbyDescriptor, LobbyId};
use arena_session::{AnonymousLogin, SessionTokenCache};
use arena_transport::Connector;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::api::{LobbyApi, RegionDiscovery};
use crate::{CreateError, RegionSelector, RegistryConfig, RegistryError};

/// Client-side view of the lobby directory for one player session.
///
/// A session creates at most one lobby. The first successful
/// [`create`](Self::create) records the lobby id; later calls, including
/// ones racing the first, return that id without touching the directory.
/// A failed creation records nothing, so the player can retry.
pub struct LobbyRegistryClient<L, A: AnonymousLogin, D, C> {
    api: L,
    tokens: Arc<SessionTokenCache<A>>,
    regions: RegionSelector<D, C>,
    config: RegistryConfig,
    /// Held across the whole creation so concurrent callers queue up.
    created: Mutex<Option<LobbyId>>,
}

impl<L, A: AnonymousLogin, D, C> LobbyRegistryClient<L, A, D, C> {
    pub fn new(
        api: L,
        tokens: Arc<SessionTokenCache<A>>,
        regions: RegionSelector<D, C>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            api,
            tokens,
            regions,
            config,
            created: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The lobby this session created, if any.
    pub async fn created_lobby(&self) -> Option<LobbyId> {
        self.created.lock().await.clone()
    }
}

impl<L, A, D, C> LobbyRegistryClient<L, A, D, C>
where
    L: LobbyApi,
    A: AnonymousLogin,
    D: RegionDiscovery,
    C: Connector,
{
    /// Creates a lobby in the fastest region.
    ///
    /// Acquires the player token (once per process), selects a region, then
    /// registers a lobby whose `max_clients` is clamped to the configured
    /// bounds and whose client count starts at zero.
    ///
    /// # Errors
    /// - [`CreateError::Auth`] — no player token
    /// - [`CreateError::Region`] — no region could be selected
    /// - [`CreateError::Registry`] — the directory rejected the request
    #[tracing::instrument(skip(self, config), fields(room_name = %config.room_name))]
    pub async fn create(&self, config: LobbyConfig) -> Result<LobbyId, CreateError> {
        let mut created = self.created.lock().await;
        if let Some(existing) = created.as_ref() {
            debug!(lobby_id = %existing, "lobby already created this session");
            return Ok(existing.clone());
        }

        let token = self.tokens.acquire().await?;
        let region = self.regions.select().await?;

        let initial_config = LobbyConfig {
            clients: 0,
            ..config.clamped(self.config.min_clients, self.config.max_clients)
        };
        let request = CreateLobbyRequest {
            visibility: self.config.visibility,
            region,
            initial_config,
        };
        let descriptor = self.api.create_lobby(&token, &request).await?;

        info!(
            lobby_id = %descriptor.lobby_id,
            region = %request.region,
            max_clients = request.initial_config.max_clients,
            "lobby created"
        );
        *created = Some(descriptor.lobby_id.clone());
        Ok(descriptor.lobby_id)
    }

    /// Public lobbies, with every config clamped to the configured bounds.
    pub async fn list(&self) -> Result<Vec<LobbyDescriptor>, RegistryError> {
        let lobbies = self.api.list_lobbies().await?;
        debug!(count = lobbies.len(), "listed lobbies");
        Ok(lobbies
            .into_iter()
            .map(|l| l.clamped(self.config.min_clients, self.config.max_clients))
            .collect())
    }
}
