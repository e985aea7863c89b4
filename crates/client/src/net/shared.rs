//! Runtime-agnostic helpers for the room WebSocket client.

use dicetable_protocol::ServerMessage;

/// Fixed delay before re-attempting a dropped connection. No backoff and
/// no attempt cap: the room endpoint is assumed always-available relative
/// to the client's own network instability.
pub const RECONNECT_DELAY_MS: u64 = 1_500;

/// Parse one inbound frame. Callers discard the `Err` case with a
/// diagnostic; a malformed frame is never surfaced to dependents.
pub fn parse_server_frame(text: &str) -> Result<ServerMessage, serde_json::Error> {
    serde_json::from_str(text)
}
