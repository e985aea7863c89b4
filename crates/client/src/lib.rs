//! Dice Table Client
//!
//! Real-time session core for a shared virtual dice table: one participant
//! creates a room, others join via a room code, and every roll is broadcast
//! to all. This crate owns the part with real invariants - turn legality,
//! seat consistency, exactly-once roll attribution - and leaves rendering
//! to the presentation port.
//!
//! Layout follows the flow of a frame: [`net`] owns the transport link and
//! yields typed [`dicetable_protocol::ServerMessage`]s, [`session`] applies
//! them to the roster / turn / roll state through a single dispatch entry
//! point, and [`ports`] is the read-only boundary presentation and
//! persistence collaborators sit behind. [`platform`] holds the desktop
//! implementations of those ports.

pub mod net;
pub mod platform;
pub mod ports;
pub mod session;
