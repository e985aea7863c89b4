//! Turn coordinator
//!
//! Tracks whose turn it is and whether the table is in strict turn order.
//! The client is a follower, never an arbiter: authoritative state changes
//! only on receipt of a turn snapshot from the server. A locally requested
//! mode change is recorded as advisory only - the legality check always
//! uses the last authoritative state, never the optimistic one.

use dicetable_protocol::TurnSnapshot;

#[derive(Debug, Clone)]
pub struct TurnCoordinator {
    turn_based: bool,
    order: Vec<String>,
    current: String,
    /// Mode the local user asked for but the server has not yet echoed.
    /// May drive a visual indicator; never consulted by `can_roll`.
    requested_mode: Option<bool>,
}

impl Default for TurnCoordinator {
    fn default() -> Self {
        // The reference room starts turn-based until told otherwise.
        Self {
            turn_based: true,
            order: Vec::new(),
            current: String::new(),
            requested_mode: None,
        }
    }
}

impl TurnCoordinator {
    /// Apply an authoritative turn snapshot. Last snapshot wins; any
    /// pending optimistic mode request is superseded.
    pub fn apply(&mut self, snapshot: &TurnSnapshot) {
        self.turn_based = snapshot.is_turn_based;
        self.order = snapshot.players_order.clone();
        self.current = snapshot.current_player.clone();
        self.requested_mode = None;
        tracing::debug!(
            turn_based = self.turn_based,
            current = %self.current,
            order = ?self.order,
            "turn state updated"
        );
    }

    /// Whether `nickname` may issue a roll command right now.
    pub fn can_roll(&self, nickname: &str) -> bool {
        !self.turn_based || self.current == nickname
    }

    /// Record a locally requested mode change (sent, not yet echoed).
    pub fn request_mode(&mut self, turn_based: bool) {
        self.requested_mode = Some(turn_based);
    }

    pub fn requested_mode(&self) -> Option<bool> {
        self.requested_mode
    }

    pub fn is_turn_based(&self) -> bool {
        self.turn_based
    }

    /// Nickname of the current-turn holder; empty when none.
    pub fn current_player(&self) -> &str {
        &self.current
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(order: &[&str], current: &str, turn_based: bool) -> TurnSnapshot {
        TurnSnapshot {
            players_order: order.iter().map(|s| s.to_string()).collect(),
            current_player: current.to_string(),
            is_turn_based: turn_based,
        }
    }

    #[test]
    fn test_turn_based_only_holder_may_roll() {
        let mut turn = TurnCoordinator::default();
        turn.apply(&snapshot(&["Alice", "Bob"], "Alice", true));

        assert!(turn.can_roll("Alice"));
        assert!(!turn.can_roll("Bob"));
    }

    #[test]
    fn test_free_for_all_anyone_may_roll() {
        let mut turn = TurnCoordinator::default();
        turn.apply(&snapshot(&["Alice", "Bob"], "Alice", false));

        assert!(turn.can_roll("Alice"));
        assert!(turn.can_roll("Bob"));
    }

    #[test]
    fn test_defaults_to_turn_based_with_no_holder() {
        let turn = TurnCoordinator::default();
        assert!(turn.is_turn_based());
        assert!(!turn.can_roll("Alice"));
    }

    #[test]
    fn test_mode_request_is_not_applied_optimistically() {
        let mut turn = TurnCoordinator::default();
        turn.apply(&snapshot(&["Alice", "Bob"], "Alice", true));

        turn.request_mode(false);

        // The advisory indicator changed, the enforced state did not.
        assert_eq!(turn.requested_mode(), Some(false));
        assert!(turn.is_turn_based());
        assert!(!turn.can_roll("Bob"));
    }

    #[test]
    fn test_authoritative_echo_clears_mode_request() {
        let mut turn = TurnCoordinator::default();
        turn.request_mode(false);

        turn.apply(&snapshot(&["Alice"], "Alice", false));

        assert_eq!(turn.requested_mode(), None);
        assert!(!turn.is_turn_based());
    }

    #[test]
    fn test_last_snapshot_wins() {
        let mut turn = TurnCoordinator::default();
        turn.apply(&snapshot(&["Alice", "Bob"], "Alice", true));
        turn.apply(&snapshot(&["Alice", "Bob"], "Bob", true));

        assert!(!turn.can_roll("Alice"));
        assert!(turn.can_roll("Bob"));
        assert_eq!(turn.current_player(), "Bob");
    }
}
