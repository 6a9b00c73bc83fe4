//! HTTP implementation of the directory endpoint traits.

use arena_protocol::{
    ConnectionInfo, CreateLobbyRequest, LobbyDescriptor, LobbyId, LobbyState, RegionCandidate,
};
use arena_session::{EndpointConfig, SessionToken};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{LobbyApi, LobbyDirectory, RegionDiscovery, RoomInfoApi};
use crate::RegistryError;

/// Talks to the external directory over HTTP.
///
/// | Operation        | Request                                           | Auth            |
/// |------------------|---------------------------------------------------|-----------------|
/// | discover         | `GET /discovery/v1/ping`                          | none            |
/// | create           | `POST /lobby/v2/{app}/create`                     | player token    |
/// | list             | `GET /lobby/v2/{app}/list/public`                 | none            |
/// | set state        | `POST /lobby/v2/{app}/setState/{lobby}`           | developer token |
/// | destroy          | `POST /rooms/v1/{app}/destroy/{lobby}`            | developer token |
/// | connection info  | `GET /rooms/v1/{app}/connectioninfo/{lobby}`      | none            |
#[derive(Debug, Clone)]
pub struct HttpLobbyClient {
    http: reqwest::Client,
    endpoint: EndpointConfig,
}

#[derive(Serialize)]
struct SetStateBody {
    state: LobbyState,
}

impl HttpLobbyClient {
    /// Builds a client with its own connection pool.
    pub fn new(endpoint: EndpointConfig) -> Result<Self, RegistryError> {
        let http = endpoint.http_client()?;
        Ok(Self { http, endpoint })
    }

    /// Builds a client that shares an existing connection pool.
    pub fn with_client(http: reqwest::Client, endpoint: EndpointConfig) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    fn app_url(&self, service: &str, op: &str) -> String {
        self.endpoint
            .url(&format!("{service}/{}/{op}", self.endpoint.app_id))
    }

    fn developer_token(&self) -> Result<&str, RegistryError> {
        self.endpoint
            .developer_token
            .as_deref()
            .ok_or(RegistryError::MissingCredential)
    }
}

/// Turns a non-success status into [`RegistryError::Status`].
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, RegistryError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(RegistryError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, RegistryError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| RegistryError::Decode(e.to_string()))
}

impl RegionDiscovery for HttpLobbyClient {
    #[tracing::instrument(skip(self))]
    async fn discover(&self) -> Result<Vec<RegionCandidate>, RegistryError> {
        let url = self.endpoint.url("discovery/v1/ping");
        let resp = check(self.http.get(&url).send().await?).await?;
        let candidates: Vec<RegionCandidate> = decode(resp).await?;
        debug!(count = candidates.len(), "discovered regions");
        Ok(candidates)
    }
}

impl LobbyApi for HttpLobbyClient {
    #[tracing::instrument(skip(self, token, request), fields(region = %request.region))]
    async fn create_lobby(
        &self,
        token: &SessionToken,
        request: &CreateLobbyRequest,
    ) -> Result<LobbyDescriptor, RegistryError> {
        let url = self.app_url("lobby/v2", "create");
        let resp = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, token.expose())
            .json(request)
            .send()
            .await?;
        decode(check(resp).await?).await
    }

    /// Entries that don't decode are skipped so one foreign record can't
    /// hide every other lobby.
    async fn list_lobbies(&self) -> Result<Vec<LobbyDescriptor>, RegistryError> {
        let url = self.app_url("lobby/v2", "list/public");
        let resp = check(self.http.get(&url).send().await?).await?;
        let entries: Vec<serde_json::Value> = decode(resp).await?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(lobby) => Some(lobby),
                Err(e) => {
                    warn!(error = %e, "skipping malformed lobby entry");
                    None
                }
            })
            .collect())
    }
}

impl LobbyDirectory for HttpLobbyClient {
    #[tracing::instrument(skip(self), fields(lobby_id = %lobby_id))]
    async fn set_state(&self, lobby_id: &LobbyId, state: LobbyState) -> Result<(), RegistryError> {
        let token = self.developer_token()?;
        let url = self.app_url("lobby/v2", &format!("setState/{lobby_id}"));
        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&SetStateBody { state })
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(lobby_id = %lobby_id))]
    async fn destroy(&self, lobby_id: &LobbyId) -> Result<(), RegistryError> {
        let token = self.developer_token()?;
        let url = self.app_url("rooms/v1", &format!("destroy/{lobby_id}"));
        let resp = self.http.post(&url).bearer_auth(token).send().await?;
        check(resp).await?;
        Ok(())
    }
}

impl RoomInfoApi for HttpLobbyClient {
    async fn connection_info(
        &self,
        room_id: &LobbyId,
    ) -> Result<Option<ConnectionInfo>, RegistryError> {
        let url = self.app_url("rooms/v1", &format!("connectioninfo/{room_id}"));
        let resp = self.http.get(&url).send().await?;
        // The record may not exist until the room process registers.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(check(resp).await?).await.map(Some)
    }
}
