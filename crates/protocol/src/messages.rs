//! WebSocket message types for table-room communication
//!
//! This module contains all message types exchanged over the WebSocket
//! connection. The client sends `ClientMessage` and receives
//! `ServerMessage`; the room server does the reverse.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Removing variants requires a major version bump
//! - Unknown frame kinds deserialize to the `Unknown` variant so the
//!   client can discard future-version frames instead of erroring

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_one() -> u32 {
    1
}

/// Turn-coordination fields carried on `turn_update` and, flattened,
/// on every membership frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    /// Participants in turn order (server-assigned arrival order)
    #[serde(default)]
    pub players_order: Vec<String>,
    /// Nickname of the participant whose turn it is; empty when none
    #[serde(default)]
    pub current_player: String,
    /// Whether roll permission is restricted to the current player.
    /// Absent means turn-based: the reference client treats anything
    /// other than an explicit `false` as turn-based.
    #[serde(default = "default_true")]
    pub is_turn_based: bool,
}

// =============================================================================
// Client Messages (table client -> room server)
// =============================================================================

/// Messages from the table client to the room server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Authenticate the connection with a display name
    Join { nickname: String },
    /// Request a dice roll (legality is re-checked server-side)
    DiceRoll {
        dice_type: String,
        quantity: u32,
        custom_sides: u32,
    },
    /// Request a switch between free-for-all and strict turn order
    ChangeMode { turn_based: bool },
}

// =============================================================================
// Server Messages (room server -> table client)
// =============================================================================

/// Messages from the room server to the table client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A participant joined; `players` is the full roster snapshot
    PlayerJoined {
        nickname: String,
        players: Vec<String>,
        #[serde(flatten)]
        turn: TurnSnapshot,
    },
    /// A participant left; `players` is the full roster snapshot
    PlayerLeft {
        nickname: String,
        players: Vec<String>,
        #[serde(flatten)]
        turn: TurnSnapshot,
    },
    /// A roll started; the matching `dice_result` arrives separately
    DiceRoll {
        nickname: String,
        #[serde(default = "default_one")]
        quantity: u32,
        dice_notation: String,
        #[serde(default)]
        sides: Option<u32>,
    },
    /// The authoritative outcome of a started roll
    DiceResult {
        nickname: String,
        dice_notation: String,
        rolls: Vec<i32>,
        /// Sum of `rolls`; the client recomputes it when absent
        #[serde(default)]
        total: Option<i32>,
        #[serde(default)]
        sides: Option<u32>,
    },
    /// Authoritative turn-state update
    TurnUpdate {
        #[serde(flatten)]
        turn: TurnSnapshot,
    },
    /// Human-readable error reported by the server, surfaced verbatim
    Error { message: String },
    /// Unknown message type for forward compatibility
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_wire_format() {
        let msg = ClientMessage::Join {
            nickname: "Alice".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "join");
        assert_eq!(json["nickname"], "Alice");
    }

    #[test]
    fn test_dice_roll_request_wire_format() {
        let msg = ClientMessage::DiceRoll {
            dice_type: "d20".to_string(),
            quantity: 2,
            custom_sides: 0,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "dice_roll");
        assert_eq!(json["dice_type"], "d20");
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["custom_sides"], 0);
    }

    #[test]
    fn test_change_mode_wire_format() {
        let msg = ClientMessage::ChangeMode { turn_based: false };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "change_mode");
        assert_eq!(json["turn_based"], false);
    }

    #[test]
    fn test_player_joined_with_flattened_turn_fields() {
        let json = r#"{
            "type": "player_joined",
            "nickname": "Bob",
            "players": ["Alice", "Bob"],
            "players_order": ["Alice", "Bob"],
            "current_player": "Alice",
            "is_turn_based": true
        }"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        match msg {
            ServerMessage::PlayerJoined {
                nickname,
                players,
                turn,
            } => {
                assert_eq!(nickname, "Bob");
                assert_eq!(players, vec!["Alice", "Bob"]);
                assert_eq!(turn.players_order, vec!["Alice", "Bob"]);
                assert_eq!(turn.current_player, "Alice");
                assert!(turn.is_turn_based);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_turn_based_defaults_to_true_when_absent() {
        let json = r#"{
            "type": "turn_update",
            "players_order": ["Alice"],
            "current_player": "Alice"
        }"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        match msg {
            ServerMessage::TurnUpdate { turn } => assert!(turn.is_turn_based),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_dice_result_with_optional_fields_absent() {
        let json = r#"{
            "type": "dice_result",
            "nickname": "Carol",
            "dice_notation": "3d6",
            "rolls": [2, 5, 6]
        }"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        match msg {
            ServerMessage::DiceResult {
                nickname,
                rolls,
                total,
                sides,
                ..
            } => {
                assert_eq!(nickname, "Carol");
                assert_eq!(rolls, vec![2, 5, 6]);
                assert_eq!(total, None);
                assert_eq!(sides, None);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_dice_roll_event_quantity_defaults_to_one() {
        let json = r#"{
            "type": "dice_roll",
            "nickname": "Dave",
            "dice_notation": "d6"
        }"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        match msg {
            ServerMessage::DiceRoll { quantity, .. } => assert_eq!(quantity, 1),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_frame_kind_is_tolerated() {
        let json = r#"{"type": "future_feature", "payload": 42}"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg, ServerMessage::Unknown);
    }

    #[test]
    fn test_server_error_frame() {
        let json = r#"{"type": "error", "message": "not your turn"}"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            msg,
            ServerMessage::Error {
                message: "not your turn".to_string()
            }
        );
    }

    #[test]
    fn test_extra_fields_from_newer_servers_are_ignored() {
        // The reference server also sends dice_type/quantity on results.
        let json = r#"{
            "type": "dice_result",
            "nickname": "Carol",
            "dice_type": "d6",
            "dice_notation": "3d6",
            "quantity": 3,
            "sides": 6,
            "rolls": [2, 5, 6],
            "total": 13
        }"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        match msg {
            ServerMessage::DiceResult { total, sides, .. } => {
                assert_eq!(total, Some(13));
                assert_eq!(sides, Some(6));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
