//! Room code token
//!
//! A room is addressed purely by a short opaque code carried in the
//! connection path (`/ws/{code}`); there is no in-band room-id field.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of generated room codes.
pub const ROOM_CODE_LEN: usize = 6;

/// Alphabet used when generating a fresh room code.
pub const ROOM_CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Error when validating a room code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomCodeError {
    /// The code is empty after trimming
    #[error("Empty room code")]
    Empty,
    /// The code cannot ride in a URL path segment
    #[error("Invalid room code: {0}")]
    Invalid(String),
}

/// An opaque room code token.
///
/// The code is treated as opaque beyond two constraints: it must be
/// non-empty and must be a single path segment (no `/` or whitespace),
/// since it addresses the room endpoint as `/ws/{code}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    pub fn new(code: impl Into<String>) -> Result<Self, RoomCodeError> {
        let code = code.into();
        let code = code.trim();
        if code.is_empty() {
            return Err(RoomCodeError::Empty);
        }
        if code.contains('/') || code.chars().any(char::is_whitespace) {
            return Err(RoomCodeError::Invalid(code.to_string()));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RoomCode {
    type Err = RoomCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_code() {
        let code = RoomCode::new("ab12cd").unwrap();
        assert_eq!(code.as_str(), "ab12cd");
    }

    #[test]
    fn test_code_is_trimmed() {
        let code = RoomCode::new("  ab12cd  ").unwrap();
        assert_eq!(code.as_str(), "ab12cd");
    }

    #[test]
    fn test_empty_code_rejected() {
        assert_eq!(RoomCode::new("   "), Err(RoomCodeError::Empty));
    }

    #[test]
    fn test_path_breaking_code_rejected() {
        assert!(matches!(
            RoomCode::new("ab/cd"),
            Err(RoomCodeError::Invalid(_))
        ));
        assert!(matches!(
            RoomCode::new("ab cd"),
            Err(RoomCodeError::Invalid(_))
        ));
    }

    #[test]
    fn test_serializes_as_bare_string() {
        let code = RoomCode::new("ab12cd").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"ab12cd\"");
    }
}
