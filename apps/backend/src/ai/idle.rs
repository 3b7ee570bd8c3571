//! Built-in executor that takes no action.

use async_trait::async_trait;
use tracing::debug;

use super::trait_def::{AiError, AiExecutor, TurnOutcome};
use crate::state::app_state::AppState;

/// Passes every turn. The default wiring until a strategy module is
/// plugged in, and a useful stand-in for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdleExecutor;

#[async_trait]
impl AiExecutor for IdleExecutor {
    async fn execute_turn(
        &self,
        _state: &AppState,
        game_id: i64,
        player_id: i64,
    ) -> Result<TurnOutcome, AiError> {
        debug!(game_id, player_id, "idle executor passes its turn");
        Ok(TurnOutcome::Passed)
    }
}
