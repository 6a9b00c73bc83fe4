//! Error types for the lobby layer.

use std::time::Duration;

use arena_session::SessionError;
use arena_transport::TransportError;

/// A directory request failed.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No usable response: DNS, TLS, connection reset or request timeout.
    #[error("directory request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The directory answered with a non-success status.
    #[error("directory returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The directory answered 2xx with a body we can't read.
    #[error("malformed directory response: {0}")]
    Decode(String),

    /// A privileged call was attempted without a developer token.
    #[error("developer token is not configured")]
    MissingCredential,
}

/// Region selection failed. Fatal to lobby creation.
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    /// The discovery endpoint could not produce a candidate list.
    #[error("region discovery failed: {0}")]
    Discovery(#[source] RegistryError),

    /// The candidate list was empty, or every probe failed.
    #[error("no region available: {0}")]
    NoRegionAvailable(String),

    /// No probe opened before the race deadline.
    #[error("region probe race timed out after {0:?}")]
    Timeout(Duration),
}

/// A probe that failed inside the race. Logged, never returned on its own.
#[derive(Debug, thiserror::Error)]
#[error("probe to {region} failed: {source}")]
pub(crate) struct ProbeFailure {
    pub(crate) region: String,
    #[source]
    pub(crate) source: TransportError,
}

/// Creating a lobby failed at one of its three steps.
#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    /// The player token could not be acquired.
    #[error(transparent)]
    Auth(#[from] SessionError),

    /// No region could be selected.
    #[error(transparent)]
    Region(#[from] RegionError),

    /// The creation request itself failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Waiting for a room to become ready failed.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The attempt budget or the deadline ran out while the room was
    /// still starting.
    #[error("room still starting after {attempts} attempts ({elapsed:?})")]
    Timeout { attempts: u32, elapsed: Duration },

    /// The caller cancelled the poll.
    #[error("poll cancelled")]
    Cancelled,

    /// A connection-info request failed.
    #[error(transparent)]
    Request(#[from] RegistryError),
}
