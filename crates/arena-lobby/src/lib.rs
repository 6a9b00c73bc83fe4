//! Lobby directory coordination for Arena.
//!
//! Everything that talks to the external lobby directory lives here:
//!
//! - [`RegionSelector`] — races connectivity probes and picks the first
//!   region that answers
//! - [`LobbyRegistryClient`] — create (once per session) and list
//!   directory entries; set state / destroy pass-throughs
//! - [`DirectoryPublisher`] — best-effort, ordered occupancy updates and
//!   the final destroy for one room
//! - [`ConnectionBootstrapPoller`] — waits until a room is ready to accept
//!   connections
//! - [`LobbyBrowser`] — keeps a refreshed lobby listing in a watch channel
//! - [`HttpLobbyClient`] — the HTTP implementation of every directory
//!   endpoint trait in [`api`]
//!
//! # Flow
//!
//! ```text
//! RegionSelector ──→ LobbyRegistryClient::create ──→ ConnectionBootstrapPoller
//!                                                        │
//!                          room joins/leaves ──→ DirectoryPublisher
//! ```

pub mod api;
mod browser;
mod config;
mod error;
mod http;
mod poller;
mod publisher;
mod region;
mod registry;

pub use api::{LobbyApi, LobbyDirectory, RegionDiscovery, RoomInfoApi};
pub use browser::{LobbyBrowser, LobbySnapshot};
pub use config::{BrowserConfig, PollConfig, RegionConfig, RegistryConfig};
pub use error::{CreateError, PollError, RegionError, RegistryError};
pub use http::HttpLobbyClient;
pub use poller::ConnectionBootstrapPoller;
pub use publisher::{DirectoryOp, DirectoryPublisher, DirectoryReport, ReportSink};
pub use region::RegionSelector;
pub use registry::LobbyRegistryClient;
