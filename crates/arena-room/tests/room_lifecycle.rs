//! Integration tests for the room lifecycle using a mock simulation and a
//! recording directory.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use arena_lobby::{DirectoryOp, DirectoryReport, LobbyDirectory, RegistryError};
use arena_protocol::{
    ClientId, InboundMessage, LobbyId, LobbyState, OutboundMessage, PlayerAction, PlayerOptions,
    RoomOptions,
};
use arena_room::{
    RoomConfig, RoomError, RoomManager, RoomState, Simulation, SimulationInit,
};
use serde_json::json;
use tokio::sync::mpsc;

// =========================================================================
// Mock simulation: acknowledges each queued action on the next update.
// =========================================================================

struct AckSim {
    pending: Vec<PlayerAction>,
}

impl Simulation for AckSim {
    fn init(init: &SimulationInit) -> Self {
        assert!(init.max_clients >= 2);
        Self {
            pending: Vec::new(),
        }
    }

    fn add_player(&mut self, client: &ClientId, name: &str) -> Vec<OutboundMessage> {
        vec![OutboundMessage::new(
            "joined",
            json!({ "id": client.as_str(), "name": name }),
        )]
    }

    fn push_action(&mut self, action: PlayerAction) {
        self.pending.push(action);
    }

    fn update(&mut self, _dt: Duration) -> Vec<OutboundMessage> {
        self.pending
            .drain(..)
            .map(|a| {
                OutboundMessage::new(
                    "ack",
                    json!({ "player": a.player_id.as_str(), "type": a.kind.as_str() }),
                )
            })
            .collect()
    }
}

// =========================================================================
// Recording directory
// =========================================================================

#[derive(Default)]
struct RecordingDirectory {
    calls: Mutex<Vec<DirectoryOp>>,
    fail_set_state: bool,
}

impl RecordingDirectory {
    fn calls(&self) -> Vec<DirectoryOp> {
        self.calls.lock().unwrap().clone()
    }

    fn destroys(&self) -> usize {
        self.calls()
            .into_iter()
            .filter(|op| *op == DirectoryOp::Destroy)
            .count()
    }
}

impl LobbyDirectory for RecordingDirectory {
    async fn set_state(&self, _id: &LobbyId, state: LobbyState) -> Result<(), RegistryError> {
        self.calls.lock().unwrap().push(DirectoryOp::SetState {
            player_count: state.player_count,
        });
        if self.fail_set_state {
            return Err(RegistryError::Status {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(())
    }

    async fn destroy(&self, _id: &LobbyId) -> Result<(), RegistryError> {
        self.calls.lock().unwrap().push(DirectoryOp::Destroy);
        Ok(())
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn cid(id: &str) -> ClientId {
    ClientId::new(id)
}

fn player(name: &str) -> PlayerOptions {
    PlayerOptions {
        player_name: name.into(),
    }
}

fn options(lobby: &str, max_players: Option<u32>) -> RoomOptions {
    RoomOptions {
        player_name: "host".into(),
        room_name: "friday night".into(),
        room_map: "dunes".into(),
        room_max_players: max_players,
        mode: "ffa".into(),
        hathora_id: LobbyId::new(lobby),
    }
}

fn manager(dir: &Arc<RecordingDirectory>) -> RoomManager<RecordingDirectory> {
    RoomManager::new(dir.clone(), RoomConfig::default())
}

fn channel() -> (
    mpsc::UnboundedSender<OutboundMessage>,
    mpsc::UnboundedReceiver<OutboundMessage>,
) {
    mpsc::unbounded_channel()
}

fn drain(rx: &mut mpsc::UnboundedReceiver<OutboundMessage>) -> Vec<OutboundMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

async fn wait_for_destroy(reports: &mut mpsc::UnboundedReceiver<DirectoryReport>) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(report) = reports.recv().await {
            if report.op == DirectoryOp::Destroy {
                return;
            }
        }
    })
    .await
    .expect("destroy report");
}

// =========================================================================
// Creation
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_room_becomes_active_with_clamped_capacity() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);

    let zero = rooms.create_room::<AckSim>(options("zero", Some(0))).unwrap();
    let missing = rooms.create_room::<AckSim>(options("missing", None)).unwrap();
    let huge = rooms.create_room::<AckSim>(options("huge", Some(40))).unwrap();

    let info = zero.info().await.unwrap();
    assert_eq!(info.state, RoomState::Active);
    assert_eq!(info.room_id, LobbyId::new("zero"));
    assert_eq!(info.max_clients, 2);
    assert_eq!(missing.info().await.unwrap().max_clients, 2);
    assert_eq!(huge.info().await.unwrap().max_clients, 16);
}

#[tokio::test(start_paused = true)]
async fn test_metadata_is_truncated() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);
    let handle = rooms
        .create_room::<AckSim>(RoomOptions {
            player_name: "a-very-long-player-name".into(),
            room_name: "the longest room name anyone has typed".into(),
            ..options("l-1", Some(4))
        })
        .unwrap();

    let meta = handle.info().await.unwrap().metadata;
    assert_eq!(meta.player_name, "a-very-long-play");
    assert_eq!(meta.room_name.chars().count(), 24);
    assert_eq!(meta.room_max_players, 4);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_room_rejected() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);
    rooms.create_room::<AckSim>(options("l-1", Some(4))).unwrap();

    let err = rooms
        .create_room::<AckSim>(options("l-1", Some(4)))
        .err()
        .unwrap();
    assert!(matches!(err, RoomError::AlreadyExists(_)));
}

// =========================================================================
// Join / leave
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_occupancy_published_in_event_order() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);
    let room = LobbyId::new("l-1");
    rooms.create_room::<AckSim>(options("l-1", Some(8))).unwrap();

    for id in ["a", "b", "c"] {
        rooms
            .join(&room, cid(id), player(id), channel().0)
            .await
            .unwrap();
    }
    rooms.leave(&cid("b")).await.unwrap();
    rooms.dispose_room(&room).await.unwrap();

    let set = |player_count| DirectoryOp::SetState { player_count };
    assert_eq!(
        dir.calls(),
        vec![set(1), set(2), set(3), set(2), DirectoryOp::Destroy]
    );
}

#[tokio::test(start_paused = true)]
async fn test_join_rejected_when_full() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);
    let room = LobbyId::new("l-1");
    rooms.create_room::<AckSim>(options("l-1", Some(2))).unwrap();

    rooms.join(&room, cid("a"), player("a"), channel().0).await.unwrap();
    rooms.join(&room, cid("b"), player("b"), channel().0).await.unwrap();
    let err = rooms
        .join(&room, cid("c"), player("c"), channel().0)
        .await
        .unwrap_err();

    assert!(matches!(err, RoomError::RoomFull(_)));
    assert_eq!(rooms.room_info(&room).await.unwrap().client_count, 2);
}

#[tokio::test(start_paused = true)]
async fn test_join_rejected_when_already_present() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);
    let handle = rooms.create_room::<AckSim>(options("l-1", Some(4))).unwrap();

    handle.join(cid("a"), player("a"), channel().0).await.unwrap();
    let err = handle
        .join(cid("a"), player("a"), channel().0)
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::AlreadyInRoom(..)));
}

#[tokio::test(start_paused = true)]
async fn test_client_can_be_in_one_room_only() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);
    rooms.create_room::<AckSim>(options("l-1", Some(4))).unwrap();
    rooms.create_room::<AckSim>(options("l-2", Some(4))).unwrap();

    rooms
        .join(&LobbyId::new("l-1"), cid("a"), player("a"), channel().0)
        .await
        .unwrap();
    let err = rooms
        .join(&LobbyId::new("l-2"), cid("a"), player("a"), channel().0)
        .await
        .unwrap_err();

    assert!(matches!(err, RoomError::InvalidState(_)));
    assert_eq!(rooms.client_room_id(&cid("a")), Some(&LobbyId::new("l-1")));
}

#[tokio::test(start_paused = true)]
async fn test_join_broadcasts_truncated_name() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);
    let handle = rooms.create_room::<AckSim>(options("l-1", Some(4))).unwrap();

    let (tx, mut rx) = channel();
    handle
        .join(cid("a"), player("abcdefghijklmnopqrstuvwxyz"), tx)
        .await
        .unwrap();

    let joined = rx.recv().await.unwrap();
    assert_eq!(joined.kind, "joined");
    assert_eq!(joined.payload["name"], "abcdefghijklmnop");
}

#[tokio::test(start_paused = true)]
async fn test_leave_unknown_client() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);
    let handle = rooms.create_room::<AckSim>(options("l-1", Some(4))).unwrap();

    let err = handle.leave(cid("ghost")).await.unwrap_err();
    assert!(matches!(err, RoomError::NotInRoom(..)));
}

// =========================================================================
// Messages and ticks
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_unknown_message_type_is_ignored() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);
    let room = LobbyId::new("l-1");
    let handle = rooms.create_room::<AckSim>(options("l-1", Some(4))).unwrap();

    let (tx, mut rx) = channel();
    rooms.join(&room, cid("a"), player("a"), tx).await.unwrap();
    drain(&mut rx);

    rooms
        .route_message(&cid("a"), InboundMessage::new("teleport", json!({ "x": 9000 })))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let info = handle.info().await.unwrap();
    assert_eq!(info.ignored_messages, 1);
    assert_eq!(info.forwarded_actions, 0);
    assert!(info.ticks > 0);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_allowed_action_reaches_simulation_and_is_broadcast() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);
    let room = LobbyId::new("l-1");
    rooms.create_room::<AckSim>(options("l-1", Some(4))).unwrap();

    let (tx_a, mut rx_a) = channel();
    let (tx_b, mut rx_b) = channel();
    rooms.join(&room, cid("a"), player("a"), tx_a).await.unwrap();
    rooms.join(&room, cid("b"), player("b"), tx_b).await.unwrap();
    drain(&mut rx_a);
    drain(&mut rx_b);

    rooms
        .route_message(&cid("a"), InboundMessage::new("shoot", json!({ "angle": 1.5 })))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    for rx in [&mut rx_a, &mut rx_b] {
        let msgs = drain(rx);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].kind, "ack");
        assert_eq!(msgs[0].payload, json!({ "player": "a", "type": "shoot" }));
    }
    assert_eq!(rooms.room_info(&room).await.unwrap().forwarded_actions, 1);
}

#[tokio::test(start_paused = true)]
async fn test_message_from_non_member_is_dropped() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);
    let handle = rooms.create_room::<AckSim>(options("l-1", Some(4))).unwrap();

    handle
        .send_message(cid("stranger"), InboundMessage::new("move", json!({})))
        .await
        .unwrap();

    let info = handle.info().await.unwrap();
    assert_eq!(info.forwarded_actions, 0);
    assert_eq!(info.ignored_messages, 0);
}

#[tokio::test(start_paused = true)]
async fn test_send_frame_decodes_json() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);
    let handle = rooms.create_room::<AckSim>(options("l-1", Some(4))).unwrap();
    handle.join(cid("a"), player("a"), channel().0).await.unwrap();

    handle
        .send_frame(cid("a"), br#"{"type": "rotate", "payload": {"deg": 90}}"#)
        .await
        .unwrap();
    assert_eq!(handle.info().await.unwrap().forwarded_actions, 1);

    let err = handle.send_frame(cid("a"), b"garbage").await.unwrap_err();
    assert!(matches!(err, RoomError::Protocol(_)));
}

// =========================================================================
// Disposal
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_dispose_destroys_once_after_failed_set_state() {
    let dir = Arc::new(RecordingDirectory {
        fail_set_state: true,
        ..Default::default()
    });
    let (sink, mut reports) = mpsc::unbounded_channel();
    let mut rooms = manager(&dir).with_report_sink(sink);
    let room = LobbyId::new("l-1");
    let handle = rooms.create_room::<AckSim>(options("l-1", Some(4))).unwrap();

    rooms.join(&room, cid("a"), player("a"), channel().0).await.unwrap();
    rooms.join(&room, cid("b"), player("b"), channel().0).await.unwrap();
    rooms.dispose_room(&room).await.unwrap();

    assert_eq!(dir.destroys(), 1);
    let mut failed = 0;
    while let Ok(report) = reports.try_recv() {
        if report.result.is_err() {
            failed += 1;
        }
    }
    assert_eq!(failed, 2);

    // A second dispose can't reach the room any more.
    assert!(matches!(handle.dispose().await, Err(RoomError::Unavailable(_))));
    assert_eq!(dir.destroys(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dispose_closes_client_channels_and_stops_ticks() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);
    let room = LobbyId::new("l-1");
    let handle = rooms.create_room::<AckSim>(options("l-1", Some(4))).unwrap();

    let (tx, mut rx) = channel();
    rooms.join(&room, cid("a"), player("a"), tx).await.unwrap();
    rooms.dispose_room(&room).await.unwrap();

    // The joined broadcast is still buffered, then the channel is closed.
    assert_eq!(rx.recv().await.unwrap().kind, "joined");
    assert!(rx.recv().await.is_none());
    assert!(matches!(handle.info().await, Err(RoomError::Unavailable(_))));
    assert_eq!(rooms.room_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_last_leave_auto_disposes() {
    let dir = Arc::new(RecordingDirectory::default());
    let (sink, mut reports) = mpsc::unbounded_channel();
    let mut rooms = manager(&dir).with_report_sink(sink);
    let room = LobbyId::new("l-1");
    rooms.create_room::<AckSim>(options("l-1", Some(4))).unwrap();

    rooms.join(&room, cid("a"), player("a"), channel().0).await.unwrap();
    rooms.leave(&cid("a")).await.unwrap();
    wait_for_destroy(&mut reports).await;

    let set = |player_count| DirectoryOp::SetState { player_count };
    assert_eq!(dir.calls(), vec![set(1), set(0), DirectoryOp::Destroy]);

    // Let the actor finish shutting down.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(rooms.prune_disposed(), 1);
    assert_eq!(rooms.room_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_auto_dispose_can_be_disabled() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = RoomManager::new(
        dir.clone(),
        RoomConfig {
            auto_dispose: false,
            ..RoomConfig::default()
        },
    );
    let room = LobbyId::new("l-1");
    rooms.create_room::<AckSim>(options("l-1", Some(4))).unwrap();

    rooms.join(&room, cid("a"), player("a"), channel().0).await.unwrap();
    rooms.leave(&cid("a")).await.unwrap();

    let info = rooms.room_info(&room).await.unwrap();
    assert_eq!(info.state, RoomState::Active);
    assert_eq!(info.client_count, 0);
    assert_eq!(dir.destroys(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_list_rooms() {
    let dir = Arc::new(RecordingDirectory::default());
    let mut rooms = manager(&dir);
    rooms.create_room::<AckSim>(options("l-1", Some(4))).unwrap();
    rooms.create_room::<AckSim>(options("l-2", Some(6))).unwrap();

    let mut ids: Vec<String> = rooms
        .list_rooms()
        .await
        .into_iter()
        .map(|info| info.room_id.to_string())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["l-1", "l-2"]);
}
