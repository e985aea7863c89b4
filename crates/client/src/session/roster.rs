//! Roster and seat layout
//!
//! The server always sends the full participant list on every membership
//! change, so the roster is replaced wholesale - never reconciled
//! incrementally. Order is server-assigned arrival order and is
//! significant: it drives both turn order and seat geometry.

/// Physical seat slots around the reference table.
pub const TOTAL_SEATS: usize = 12;

/// One participant placed at a physical seat slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatedPlayer {
    pub name: String,
    pub seat: usize,
}

/// The ordered set of present participants.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<String>,
}

impl Roster {
    /// Replace the roster with the snapshot carried on a membership frame.
    pub fn apply_snapshot(&mut self, names: &[String]) {
        self.players = names.to_vec();
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }

    /// Seat assignment for the current roster, in roster order.
    ///
    /// Derived, never stored: a pure function of the roster, recomputed on
    /// every change. Participants whose computed seat falls outside the
    /// table are dropped (they render unseated).
    pub fn seat_assignments(&self) -> Vec<SeatedPlayer> {
        let count = self.players.len();
        self.players
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                seat_for(index, count).map(|seat| SeatedPlayer {
                    name: name.clone(),
                    seat,
                })
            })
            .collect()
    }
}

/// Seat slot for the participant at `index` of a roster of `count`.
///
/// The placement favors visual symmetry around the table over even angular
/// spacing: 1 player sits at the head, 2 sit directly opposite, 3 and 4
/// split the table evenly. For five or more the clock angle is rounded to
/// the nearest seat, which can collide for some counts - an accepted
/// approximation, not a bijection.
pub fn seat_for(index: usize, count: usize) -> Option<usize> {
    if index >= count {
        return None;
    }
    let seat = match count {
        0 => return None,
        1 => 0,
        2 => index * 6,
        3 => index * 4,
        4 => (index * 3) % TOTAL_SEATS,
        _ => {
            let hour_angle = (index as f64 / count as f64) * TOTAL_SEATS as f64;
            (hour_angle.round() as usize) % TOTAL_SEATS
        }
    };
    (seat < TOTAL_SEATS).then_some(seat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seats(count: usize) -> Vec<usize> {
        (0..count).filter_map(|i| seat_for(i, count)).collect()
    }

    #[test]
    fn test_single_player_sits_at_head() {
        assert_eq!(seats(1), vec![0]);
    }

    #[test]
    fn test_two_players_sit_opposite() {
        assert_eq!(seats(2), vec![0, 6]);
    }

    #[test]
    fn test_three_players_split_thirds() {
        assert_eq!(seats(3), vec![0, 4, 8]);
    }

    #[test]
    fn test_four_players_split_quarters() {
        assert_eq!(seats(4), vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_small_counts_are_pairwise_distinct() {
        for count in 1..=4 {
            let mut s = seats(count);
            s.sort_unstable();
            s.dedup();
            assert_eq!(s.len(), count, "collision for {} players", count);
        }
    }

    #[test]
    fn test_all_counts_stay_within_table() {
        for count in 1..=TOTAL_SEATS {
            for seat in seats(count) {
                assert!(seat < TOTAL_SEATS, "seat {} out of range", seat);
            }
            assert_eq!(seats(count).len(), count);
        }
    }

    #[test]
    fn test_index_beyond_count_is_unseated() {
        assert_eq!(seat_for(2, 2), None);
        assert_eq!(seat_for(0, 0), None);
    }

    #[test]
    fn test_seat_for_is_deterministic() {
        for count in 1..=TOTAL_SEATS {
            assert_eq!(seats(count), seats(count));
        }
    }

    #[test]
    fn test_snapshot_replacement_is_idempotent() {
        let mut roster = Roster::default();
        let snapshot = vec!["Alice".to_string(), "Bob".to_string()];

        roster.apply_snapshot(&snapshot);
        let first = roster.seat_assignments();
        roster.apply_snapshot(&snapshot);
        let second = roster.seat_assignments();

        assert_eq!(first, second);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_assignments_follow_roster_growth() {
        let mut roster = Roster::default();

        roster.apply_snapshot(&["Alice".to_string()]);
        assert_eq!(
            roster.seat_assignments(),
            vec![SeatedPlayer {
                name: "Alice".to_string(),
                seat: 0
            }]
        );

        roster.apply_snapshot(&["Alice".to_string(), "Bob".to_string()]);
        assert_eq!(
            roster.seat_assignments(),
            vec![
                SeatedPlayer {
                    name: "Alice".to_string(),
                    seat: 0
                },
                SeatedPlayer {
                    name: "Bob".to_string(),
                    seat: 6
                }
            ]
        );
    }
}
