//! Dice request resolution and notation parsing
//!
//! The wire carries a dice-type token ("d6", "d20", "custom", ...) plus a
//! quantity and an optional custom side count. Resolution mirrors the room
//! server: `custom` takes its side count from `custom_sides` when that is
//! greater than 1, any other token is the side count after the leading
//! `d`/`D`, and anything unparseable falls back to a d6.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Server-side clamp on dice per roll.
pub const MAX_DICE_PER_ROLL: u32 = 20;

/// A die has at least two sides.
pub const MIN_DIE_SIDES: u32 = 2;

const DEFAULT_SIDES: u32 = 6;

/// Error when parsing a dice notation string like "3d6"
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The notation string is empty
    #[error("Empty dice notation")]
    Empty,
    /// Invalid format - expected XdY
    #[error("Invalid dice notation: {0}")]
    InvalidFormat(String),
    /// Dice count must be at least 1
    #[error("Dice count must be at least 1")]
    InvalidQuantity,
    /// Die size must be at least 2
    #[error("Die size must be at least {MIN_DIE_SIDES}")]
    InvalidSides,
}

/// A roll request as the user expressed it: a dice-type token, a count,
/// and the side count backing the `custom` token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRequest {
    pub dice_type: String,
    pub quantity: u32,
    pub custom_sides: u32,
}

impl DiceRequest {
    /// Parse a notation string like "3d6", "d20" or "2d7".
    ///
    /// Standard side counts map to their select token ("d6", "d20", ...);
    /// anything else becomes a `custom` request.
    pub fn from_notation(input: &str) -> Result<Self, DiceParseError> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let d_pos = input.find('d').ok_or_else(|| {
            DiceParseError::InvalidFormat(format!("Missing 'd' separator in '{}'", input))
        })?;

        let quantity_str = &input[..d_pos];
        let quantity: u32 = if quantity_str.is_empty() {
            1 // "d20" means "1d20"
        } else {
            quantity_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid dice count: '{}'", quantity_str))
            })?
        };
        if quantity == 0 {
            return Err(DiceParseError::InvalidQuantity);
        }

        let sides_str = &input[d_pos + 1..];
        let sides: u32 = sides_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid die size: '{}'", sides_str))
        })?;
        if sides < MIN_DIE_SIDES {
            return Err(DiceParseError::InvalidSides);
        }

        const STANDARD_SIDES: [u32; 6] = [4, 6, 8, 10, 12, 20];
        Ok(if STANDARD_SIDES.contains(&sides) {
            Self {
                dice_type: format!("d{}", sides),
                quantity,
                custom_sides: 0,
            }
        } else {
            Self {
                dice_type: "custom".to_string(),
                quantity,
                custom_sides: sides,
            }
        })
    }

    /// Resolve the request into a concrete (quantity, sides) pair, applying
    /// the same clamps as the room server.
    pub fn resolve(&self) -> ResolvedDice {
        let sides = if self.dice_type == "custom" && self.custom_sides > 1 {
            self.custom_sides
        } else {
            self.dice_type
                .trim_start_matches(['d', 'D'])
                .parse()
                .unwrap_or(DEFAULT_SIDES)
        };

        ResolvedDice {
            quantity: self.quantity.clamp(1, MAX_DICE_PER_ROLL),
            sides: sides.max(MIN_DIE_SIDES),
        }
    }
}

/// A dice request after token resolution and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDice {
    pub quantity: u32,
    pub sides: u32,
}

impl ResolvedDice {
    /// The wire notation for this roll, e.g. "3d6".
    pub fn notation(&self) -> String {
        format!("{}d{}", self.quantity, self.sides)
    }
}

impl fmt::Display for ResolvedDice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_notation() {
        let req = DiceRequest::from_notation("3d6").unwrap();
        assert_eq!(req.dice_type, "d6");
        assert_eq!(req.quantity, 3);
        assert_eq!(req.custom_sides, 0);
    }

    #[test]
    fn test_parse_shorthand_notation() {
        let req = DiceRequest::from_notation("d20").unwrap();
        assert_eq!(req.dice_type, "d20");
        assert_eq!(req.quantity, 1);
    }

    #[test]
    fn test_parse_nonstandard_sides_becomes_custom() {
        let req = DiceRequest::from_notation("2d7").unwrap();
        assert_eq!(req.dice_type, "custom");
        assert_eq!(req.quantity, 2);
        assert_eq!(req.custom_sides, 7);
    }

    #[test]
    fn test_parse_case_insensitive_with_whitespace() {
        let req = DiceRequest::from_notation("  2D6 ").unwrap();
        assert_eq!(req.dice_type, "d6");
        assert_eq!(req.quantity, 2);
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            DiceRequest::from_notation(""),
            Err(DiceParseError::Empty)
        ));
    }

    #[test]
    fn test_parse_no_separator() {
        assert!(matches!(
            DiceRequest::from_notation("20"),
            Err(DiceParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_zero_dice() {
        assert!(matches!(
            DiceRequest::from_notation("0d6"),
            Err(DiceParseError::InvalidQuantity)
        ));
    }

    #[test]
    fn test_parse_one_sided_die() {
        assert!(matches!(
            DiceRequest::from_notation("1d1"),
            Err(DiceParseError::InvalidSides)
        ));
    }

    #[test]
    fn test_resolve_standard_token() {
        let req = DiceRequest {
            dice_type: "d20".to_string(),
            quantity: 2,
            custom_sides: 0,
        };
        let resolved = req.resolve();
        assert_eq!(resolved.quantity, 2);
        assert_eq!(resolved.sides, 20);
        assert_eq!(resolved.notation(), "2d20");
    }

    #[test]
    fn test_resolve_custom_token() {
        let req = DiceRequest {
            dice_type: "custom".to_string(),
            quantity: 1,
            custom_sides: 7,
        };
        assert_eq!(req.resolve().sides, 7);
    }

    #[test]
    fn test_resolve_custom_without_sides_falls_back_to_d6() {
        let req = DiceRequest {
            dice_type: "custom".to_string(),
            quantity: 1,
            custom_sides: 0,
        };
        assert_eq!(req.resolve().sides, 6);
    }

    #[test]
    fn test_resolve_unparseable_token_falls_back_to_d6() {
        let req = DiceRequest {
            dice_type: "weird".to_string(),
            quantity: 1,
            custom_sides: 0,
        };
        assert_eq!(req.resolve().sides, 6);
    }

    #[test]
    fn test_resolve_clamps_quantity() {
        let req = DiceRequest {
            dice_type: "d6".to_string(),
            quantity: 99,
            custom_sides: 0,
        };
        assert_eq!(req.resolve().quantity, MAX_DICE_PER_ROLL);

        let req = DiceRequest {
            dice_type: "d6".to_string(),
            quantity: 0,
            custom_sides: 0,
        };
        assert_eq!(req.resolve().quantity, 1);
    }
}
