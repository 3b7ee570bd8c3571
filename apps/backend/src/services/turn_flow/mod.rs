//! Turn flow orchestration - turn coordination, guarded player actions,
//! fee settlement and the background AI chain.
//!
//! Every player-initiated mutation runs through the guard in `guard.rs`:
//! one transaction, row locks on the game and the acting player, a
//! turn-ownership check, and centralized deck compensation on failure.

mod advance;
mod ai_chain;
mod fees;
mod guard;
mod player_actions;

pub use advance::TurnAdvance;
pub use guard::ActiveTurn;
pub use player_actions::{
    DeliverOutcome, DiscardOutcome, MoveOutcome, RestartOutcome, UndoOutcome,
};

/// Turn flow service - stateless facade over the turn engine.
#[derive(Default)]
pub struct TurnFlowService;
