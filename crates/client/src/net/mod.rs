//! Transport link to the room endpoint.
//!
//! [`RoomClient`] owns the WebSocket, sends the authenticated join on open
//! and applies the reconnection policy; [`shared`] holds the pieces that
//! have no runtime dependency so the session core can be tested without a
//! socket.

pub mod client;
pub mod shared;

pub use client::RoomClient;

use anyhow::{anyhow, Result};
use dicetable_protocol::RoomCode;
use url::Url;

/// Connection state for the table session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected to the room
    Disconnected,
    /// Attempting to establish connection
    Connecting,
    /// Successfully connected and joined
    Connected,
    /// Connection lost, retry scheduled
    Reconnecting,
}

/// Derive the room endpoint from the server base URL and room code.
///
/// Room identity rides purely in the path (`/ws/{code}`); there is no
/// in-band room-id field in any frame.
pub fn room_endpoint(base_url: &str, room: &RoomCode) -> Result<String> {
    let mut url = Url::parse(base_url)?;
    match url.scheme() {
        "ws" | "wss" => {}
        other => return Err(anyhow!("expected a ws:// or wss:// URL, got {other}://")),
    }
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| anyhow!("cannot-be-a-base URL: {base_url}"))?;
        segments.pop_if_empty();
        segments.push("ws");
        segments.push(room.as_str());
    }
    Ok(url.into())
}
