//! Data types shared by every Arena layer.
//!
//! - **Identity** ([`LobbyId`], [`ClientId`]) — the directory entry id
//!   (which doubles as the authoritative room id) and a client's
//!   transport session id.
//! - **Directory** ([`LobbyDescriptor`], [`LobbyConfig`], [`Region`],
//!   [`ConnectionInfo`], ...) — the JSON shapes exchanged with the
//!   external lobby directory.
//! - **Room messages** ([`InboundMessage`], [`PlayerAction`],
//!   [`OutboundMessage`], [`RoomOptions`]) — what crosses the real-time
//!   transport boundary.
//! - **Codec** ([`Codec`], [`JsonCodec`]) — bytes in, typed values out.
//!
//! ```text
//! Directory (HTTP JSON) ─┐
//!                        ├─→ Protocol types → lobby / room layers
//! Transport (frames) ────┘
//! ```

mod codec;
mod error;
mod lobby;
mod message;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use lobby::{
    ConnectionInfo, ConnectionStatus, CreateLobbyRequest, LobbyConfig,
    LobbyDescriptor, LobbyState, Region, RegionCandidate, Visibility,
};
pub use message::{
    ActionKind, InboundMessage, OutboundMessage, PlayerAction, PlayerOptions,
    RoomOptions,
};
pub use types::{ClientId, LobbyId};
