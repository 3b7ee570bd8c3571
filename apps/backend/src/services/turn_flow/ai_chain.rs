//! Detached background chain through consecutive AI turns.
//!
//! One task per chain, an explicit loop rather than recursive spawning.
//! Executor failures and deadline overruns are logged and swallowed: the
//! turn is forfeited and the chain advances regardless, so a broken AI can
//! never stall the game. The chain stops when a human becomes current or
//! after a full cycle of the table.

use tracing::{debug, warn};

use super::advance::AdvanceOutcome;
use super::TurnFlowService;
use crate::db::txn::with_txn;
use crate::state::app_state::AppState;

pub(super) fn spawn_ai_chain(state: AppState, game_id: i64, first: AdvanceOutcome) {
    let _chain = tokio::spawn(async move {
        let mut next = first;
        let mut hops = 0usize;

        while next.advance.next_player_is_ai {
            hops += 1;
            if hops > next.player_count {
                warn!(
                    game_id,
                    hops, "AI chain completed a full cycle without reaching a human; stopping"
                );
                return;
            }

            let player_id = next.advance.next_player_id;
            let executor = state.executor.clone();
            match tokio::time::timeout(
                state.ai_deadline,
                executor.execute_turn(&state, game_id, player_id),
            )
            .await
            {
                Ok(Ok(outcome)) => {
                    debug!(game_id, player_id, ?outcome, "AI turn finished");
                }
                Ok(Err(err)) => {
                    warn!(game_id, player_id, error = %err, "AI turn failed; turn is forfeited");
                }
                Err(_) => {
                    warn!(
                        game_id,
                        player_id,
                        deadline_ms = state.ai_deadline.as_millis() as u64,
                        "AI turn exceeded its deadline; turn is forfeited"
                    );
                }
            }

            next = match with_txn(None, &state, |txn| {
                Box::pin(async move { TurnFlowService::advance_turn(txn, game_id).await })
            })
            .await
            {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(game_id, error = %err, "failed to advance past AI turn; stopping chain");
                    return;
                }
            };
        }

        debug!(
            game_id,
            next_player_id = next.advance.next_player_id,
            "AI chain reached a human player"
        );
    });
}
