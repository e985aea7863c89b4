//! Roll synchronizer
//!
//! Correlates `dice_roll` (started) with its eventual `dice_result`
//! (resolved). At most one roll is in flight per initiating participant;
//! different participants may roll concurrently since the table has no
//! shared roller lock. Also hosts the solo-mode simulation - the only
//! place randomness originates client-side. In networked mode every result
//! the client displays is supplied by the server.

use std::collections::HashMap;

use dicetable_protocol::{ResolvedDice, ServerMessage};
use rand::Rng;

/// Artificial delay between a simulated start and its resolution, so solo
/// mode produces the same two-phase shape the wire does.
pub const SOLO_RESOLVE_DELAY_MS: u64 = 1_000;

/// Client-side clamp on dice per solo roll.
pub const MAX_SOLO_DICE: u32 = 10;

/// A roll that has started but not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRoll {
    pub notation: String,
    pub quantity: u32,
}

/// The published outcome of one roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutcome {
    pub nickname: String,
    pub notation: String,
    pub rolls: Vec<i32>,
    pub total: i32,
    pub sides: Option<u32>,
}

/// Tracks in-flight rolls keyed by initiator nickname.
#[derive(Debug, Default)]
pub struct RollTracker {
    pending: HashMap<String, PendingRoll>,
}

impl RollTracker {
    /// Open a roll lifecycle for `nickname`.
    ///
    /// The protocol does not support overlapping rolls from one
    /// participant, so a stale unresolved entry is replaced.
    pub fn begin(&mut self, nickname: &str, notation: &str, quantity: u32) {
        let pending = PendingRoll {
            notation: notation.to_string(),
            quantity,
        };
        if let Some(stale) = self.pending.insert(nickname.to_string(), pending) {
            tracing::debug!(
                nickname,
                stale = %stale.notation,
                "replacing unresolved roll"
            );
        }
    }

    /// Close the lifecycle for `nickname` and assemble the outcome.
    ///
    /// A result with no matching start is still displayed; the total is
    /// recomputed from the individual rolls when the frame omits it.
    pub fn resolve(
        &mut self,
        nickname: &str,
        notation: &str,
        rolls: Vec<i32>,
        total: Option<i32>,
        sides: Option<u32>,
    ) -> RollOutcome {
        if self.pending.remove(nickname).is_none() {
            tracing::debug!(nickname, "result without a pending roll");
        }
        let total = total.unwrap_or_else(|| rolls.iter().sum());
        RollOutcome {
            nickname: nickname.to_string(),
            notation: notation.to_string(),
            rolls,
            total,
            sides,
        }
    }

    pub fn pending_for(&self, nickname: &str) -> Option<&PendingRoll> {
        self.pending.get(nickname)
    }

    /// Discard every in-flight lifecycle (reconnect policy: the next
    /// snapshot is fully authoritative, stale correlation state is not).
    pub fn clear(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!(count = self.pending.len(), "discarding in-flight rolls");
            self.pending.clear();
        }
    }
}

/// A locally simulated roll: the same started/resolved frame pair the
/// server would send, so presentation stays transport-agnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedRoll {
    pub started: ServerMessage,
    pub resolved: ServerMessage,
}

/// Synthesize a solo-mode roll for `nickname`: one uniform integer in
/// `[1, sides]` per die.
pub fn simulate(nickname: &str, dice: ResolvedDice) -> SimulatedRoll {
    let quantity = dice.quantity.min(MAX_SOLO_DICE);
    let dice = ResolvedDice {
        quantity,
        sides: dice.sides,
    };
    let notation = dice.notation();

    let mut rng = rand::thread_rng();
    let rolls: Vec<i32> = (0..quantity)
        .map(|_| rng.gen_range(1..=dice.sides as i32))
        .collect();
    let total: i32 = rolls.iter().sum();

    SimulatedRoll {
        started: ServerMessage::DiceRoll {
            nickname: nickname.to_string(),
            quantity,
            dice_notation: notation.clone(),
            sides: Some(dice.sides),
        },
        resolved: ServerMessage::DiceResult {
            nickname: nickname.to_string(),
            dice_notation: notation,
            rolls,
            total: Some(total),
            sides: Some(dice.sides),
        },
    }
}
