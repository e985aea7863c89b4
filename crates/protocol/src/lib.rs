//! Dice Table Protocol - shared types for table client and room server
//!
//! This crate contains every type that crosses the WebSocket boundary:
//! - WebSocket message types (`ClientMessage`, `ServerMessage`)
//! - The turn snapshot carried on membership and turn frames
//! - Dice request resolution (dice-type token -> sides + notation)
//! - The room code token
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and thiserror
//! 2. **No business logic** - Pure data types and serialization
//! 3. **Nicknames are identity** - The wire carries no numeric ids

pub mod dice;
pub mod messages;
pub mod room;

pub use dice::{DiceParseError, DiceRequest, ResolvedDice, MAX_DICE_PER_ROLL, MIN_DIE_SIDES};
pub use messages::{ClientMessage, ServerMessage, TurnSnapshot};
pub use room::{RoomCode, RoomCodeError, ROOM_CODE_ALPHABET, ROOM_CODE_LEN};
