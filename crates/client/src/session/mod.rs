//! Session state machine
//!
//! One [`SessionController`] owns the roster, turn state and roll tracker
//! for a table session and is the single mutation path for all three:
//! every inbound frame goes through [`SessionController::handle_frame`],
//! every local command through its request methods. Nothing here touches a
//! socket, which keeps the whole state machine unit-testable; the
//! composition root wires the controller to [`crate::net::RoomClient`].

pub mod rolls;
pub mod roster;
pub mod turn;

use std::sync::Arc;

use dicetable_protocol::{ClientMessage, DiceRequest, ServerMessage, TurnSnapshot};

use crate::net::ConnectionState;
use crate::ports::Presentation;
use rolls::{RollTracker, SimulatedRoll};
use roster::Roster;
use turn::TurnCoordinator;

/// What a local roll request resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum RollCommand {
    /// Legality holds: send this frame to the server.
    Send(ClientMessage),
    /// Solo session: apply the simulated frame pair locally.
    Simulate(SimulatedRoll),
    /// Rejected before any frame was sent (out of turn).
    Rejected,
}

/// Controller for one table session.
pub struct SessionController {
    local_name: String,
    solo: bool,
    roster: Roster,
    turn: TurnCoordinator,
    rolls: RollTracker,
    presentation: Arc<dyn Presentation>,
}

impl SessionController {
    /// Controller for a networked session. State stays empty until the
    /// first authoritative snapshot arrives.
    pub fn new(local_name: impl Into<String>, presentation: Arc<dyn Presentation>) -> Self {
        Self {
            local_name: local_name.into(),
            solo: false,
            roster: Roster::default(),
            turn: TurnCoordinator::default(),
            rolls: RollTracker::default(),
            presentation,
        }
    }

    /// Controller for a solo session: no transport, a synthesized roster of
    /// one, free-for-all mode, reported as connected immediately.
    pub fn solo(local_name: impl Into<String>, presentation: Arc<dyn Presentation>) -> Self {
        let mut controller = Self::new(local_name, presentation);
        controller.solo = true;

        let name = controller.local_name.clone();
        controller.roster.apply_snapshot(std::slice::from_ref(&name));
        controller.turn.apply(&TurnSnapshot {
            players_order: vec![name.clone()],
            current_player: name,
            is_turn_based: false,
        });
        controller.render_table();
        controller
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn is_solo(&self) -> bool {
        self.solo
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn turn(&self) -> &TurnCoordinator {
        &self.turn
    }

    pub fn rolls(&self) -> &RollTracker {
        &self.rolls
    }

    /// Single dispatch entry point for inbound frames.
    pub fn handle_frame(&mut self, frame: ServerMessage) {
        match frame {
            ServerMessage::PlayerJoined {
                nickname,
                players,
                turn,
            } => {
                self.roster.apply_snapshot(&players);
                self.turn.apply(&turn);
                self.presentation
                    .render_system_notice(&format!("{} joined the table", nickname));
                self.render_table();
            }
            ServerMessage::PlayerLeft {
                nickname,
                players,
                turn,
            } => {
                self.roster.apply_snapshot(&players);
                self.turn.apply(&turn);
                self.presentation
                    .render_system_notice(&format!("{} left the table", nickname));
                self.render_table();
            }
            ServerMessage::DiceRoll {
                nickname,
                quantity,
                dice_notation,
                sides: _,
            } => {
                self.rolls.begin(&nickname, &dice_notation, quantity);
                self.presentation.render_roll_pending(&nickname, quantity);
            }
            ServerMessage::DiceResult {
                nickname,
                dice_notation,
                rolls,
                total,
                sides,
            } => {
                let outcome = self
                    .rolls
                    .resolve(&nickname, &dice_notation, rolls, total, sides);
                self.presentation.render_roll_result(&outcome);
            }
            ServerMessage::TurnUpdate { turn } => {
                self.turn.apply(&turn);
                self.render_table();
            }
            ServerMessage::Error { message } => {
                self.presentation.render_system_notice(&message);
            }
            ServerMessage::Unknown => {
                tracing::debug!("discarding unrecognized frame kind");
            }
        }
    }

    /// React to a transport state change.
    ///
    /// On a drop every in-flight roll lifecycle is discarded: the next
    /// membership/turn snapshot after reconnect is fully authoritative and
    /// stale correlation state must not resolve against it.
    pub fn handle_connection_change(&mut self, state: ConnectionState) {
        match state {
            ConnectionState::Reconnecting => {
                self.rolls.clear();
                self.presentation
                    .render_system_notice("Connection lost. Reconnecting...");
            }
            ConnectionState::Disconnected => {
                self.rolls.clear();
            }
            ConnectionState::Connecting | ConnectionState::Connected => {}
        }
    }

    /// Validate and route a local roll request.
    ///
    /// Out-of-turn attempts are rejected here, before any frame is sent -
    /// the server would reject them anyway, so the round trip is saved.
    pub fn request_roll(&mut self, request: &DiceRequest) -> RollCommand {
        if self.solo {
            return RollCommand::Simulate(rolls::simulate(&self.local_name, request.resolve()));
        }

        if !self.turn.can_roll(&self.local_name) {
            self.presentation.render_system_notice(&format!(
                "It's {}'s turn now. Wait for your move.",
                self.turn.current_player()
            ));
            return RollCommand::Rejected;
        }

        RollCommand::Send(ClientMessage::DiceRoll {
            dice_type: request.dice_type.clone(),
            quantity: request.quantity,
            custom_sides: request.custom_sides,
        })
    }

    /// Route a local mode-change request. The new mode is sent but not
    /// applied until the authoritative echo arrives.
    pub fn request_mode_change(&mut self, turn_based: bool) -> Option<ClientMessage> {
        if self.solo {
            return None;
        }
        self.turn.request_mode(turn_based);
        Some(ClientMessage::ChangeMode { turn_based })
    }

    fn render_table(&self) {
        self.presentation.render_seats(
            &self.roster.seat_assignments(),
            &self.local_name,
            self.turn.current_player(),
        );
    }
}
