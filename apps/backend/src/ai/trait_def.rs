//! AI executor trait definition.

use std::fmt;

use async_trait::async_trait;

use crate::state::app_state::AppState;

/// Errors that can occur while an AI plays its turn.
#[derive(Debug)]
pub enum AiError {
    /// AI encountered an internal error
    Internal(String),
    /// AI attempted an action the engine rejected
    InvalidAction(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::Internal(msg) => write!(f, "AI internal error: {msg}"),
            AiError::InvalidAction(msg) => write!(f, "AI invalid action: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

/// What an executor did with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The executor committed at least one action.
    Acted,
    /// The executor chose to take no action.
    Passed,
}

/// Plays one full turn for an AI-controlled player.
///
/// Invoked only by the turn coordinator's background chain, under a
/// deadline. Implementations act through the same guarded operations as
/// human requests, so an executor that outlives its deadline has any late
/// mutation rejected by the turn-ownership check.
#[async_trait]
pub trait AiExecutor: Send + Sync {
    async fn execute_turn(
        &self,
        state: &AppState,
        game_id: i64,
        player_id: i64,
    ) -> Result<TurnOutcome, AiError>;
}
