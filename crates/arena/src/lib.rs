//! # Arena
//!
//! Lobby and session lifecycle coordination for real-time game rooms.
//!
//! Arena sits between players, an external lobby directory and the
//! authoritative rooms the directory advertises. On the player side it
//! picks the fastest region, registers a lobby once per session and waits
//! for the room to come up. On the room side it runs each room as an actor
//! and keeps the directory's view of its occupancy up to date.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arena::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), ArenaError> {
//! arena::init_tracing();
//! let config = ArenaConfig::from_env()?;
//! let flow = HttpHostFlow::from_config(&config)?;
//!
//! let room = flow
//!     .create_and_connect(
//!         LobbyConfig {
//!             room_name: "friday".into(),
//!             map_name: "dunes".into(),
//!             max_clients: 8,
//!             mode: "ffa".into(),
//!             clients: 0,
//!         },
//!         &CancellationToken::new(),
//!     )
//!     .await?;
//! println!("connect to {:?}", room.connection.address());
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod flow;

pub use config::{ArenaConfig, ENV_APP_ID, ENV_BASE_URL, ENV_DEVELOPER_TOKEN};
pub use error::ArenaError;
pub use flow::{HostFlow, HttpHostFlow, ReadyRoom, room_manager};

pub use arena_lobby as lobby;
pub use arena_protocol as protocol;
pub use arena_room as room;
pub use arena_session as session;
pub use arena_tick as tick;
pub use arena_transport as transport;

/// Installs a `tracing` subscriber that honours `RUST_LOG` (default
/// `info`). Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

pub mod prelude {
    pub use crate::{ArenaConfig, ArenaError, HostFlow, HttpHostFlow, ReadyRoom};
    pub use arena_lobby::{LobbyBrowser, LobbySnapshot};
    pub use arena_protocol::{
        ClientId, ConnectionInfo, InboundMessage, LobbyConfig, LobbyId, OutboundMessage,
        PlayerAction, PlayerOptions, RoomOptions,
    };
    pub use arena_room::{RoomConfig, RoomHandle, RoomManager, Simulation, SimulationInit};
}
