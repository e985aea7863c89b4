//! Outbound ports for the presentation and persistence collaborators.
//!
//! Presentation reads session state but must never mutate it; everything it
//! needs crosses this boundary as borrowed views. The session core calls
//! these ports, never the other way around.

use crate::session::rolls::RollOutcome;
use crate::session::roster::SeatedPlayer;

/// Port for the seat/table/history renderer.
///
/// Implementations must not block: long-running work (animation) happens on
/// the collaborator's side and does not gate protocol state.
#[cfg_attr(test, mockall::automock)]
pub trait Presentation: Send + Sync {
    /// Redraw the table after a roster or turn change.
    fn render_seats(&self, seats: &[SeatedPlayer], local_name: &str, current_holder: &str);

    /// A roll started; show an indeterminate animation for `initiator`.
    fn render_roll_pending(&self, initiator: &str, quantity: u32);

    /// A roll resolved; the individual-die list may drive per-die settling.
    fn render_roll_result(&self, outcome: &RollOutcome);

    /// Transient notices: joins, leaves, rejections, server errors.
    fn render_system_notice(&self, text: &str);
}

/// Port for the saved-preferences collaborator (nickname, mute flag).
#[cfg_attr(test, mockall::automock)]
pub trait NicknameStore: Send + Sync {
    fn get_saved_name(&self) -> Option<String>;
    fn save_name(&self, name: &str);
    fn clear_name(&self);
}
