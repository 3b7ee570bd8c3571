//! Turn-pointer advancement.
//!
//! `end_turn` commits the pointer move and returns immediately; if the new
//! active player is AI-controlled, a detached chain task (see `ai_chain`)
//! plays through consecutive AI turns without blocking the caller.

use sea_orm::DatabaseTransaction;
use serde::Serialize;
use tracing::info;

use super::{ai_chain, TurnFlowService};
use crate::db::txn::with_txn;
use crate::entities::game_players::PlayerKind;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::{games, players};
use crate::state::app_state::AppState;

/// Result of advancing the turn pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnAdvance {
    pub current_player_index: i32,
    pub next_player_id: i64,
    pub next_player_is_ai: bool,
}

/// Internal advance result; carries the player count for the chain's
/// full-cycle guard.
#[derive(Debug, Clone)]
pub(super) struct AdvanceOutcome {
    pub advance: TurnAdvance,
    pub player_count: usize,
}

impl TurnFlowService {
    /// End the current turn and hand the game to the next player in order.
    ///
    /// Never waits for an AI turn: when the next player is AI-controlled
    /// the chain runs as a detached background task.
    pub async fn end_turn(&self, state: &AppState, game_id: i64) -> Result<TurnAdvance, AppError> {
        let outcome = with_txn(None, state, |txn| {
            Box::pin(async move { TurnFlowService::advance_turn(txn, game_id).await })
        })
        .await?;

        if outcome.advance.next_player_is_ai {
            ai_chain::spawn_ai_chain(state.clone(), game_id, outcome.clone());
        }
        Ok(outcome.advance)
    }

    /// Advance the pointer inside an existing transaction. Serialized per
    /// game by the exclusive lock on the game row.
    pub(super) async fn advance_turn(
        txn: &DatabaseTransaction,
        game_id: i64,
    ) -> Result<AdvanceOutcome, AppError> {
        let game = games::require_game_for_update(txn, game_id).await?;
        let all_players = players::find_all_by_game(txn, game_id).await?;
        if all_players.is_empty() {
            return Err(DomainError::not_found(
                NotFoundKind::Players,
                format!("game {game_id} has no players"),
            )
            .into());
        }

        let count = all_players.len();
        let current = (game.current_player_index as usize).min(count - 1);
        let next = (current + 1) % count;

        // The outgoing player's turn is over; bumping their counter is what
        // supersedes this turn's ledger entries.
        players::increment_turn_no(txn, all_players[current].id).await?;
        games::set_current_player_index(txn, game_id, next as i32).await?;

        let next_player = &all_players[next];
        let next_player_is_ai = next_player.kind == PlayerKind::Ai;
        info!(
            game_id,
            current_player_index = next as i32,
            next_player_id = next_player.id,
            next_player_is_ai,
            "turn advanced"
        );

        Ok(AdvanceOutcome {
            advance: TurnAdvance {
                current_player_index: next as i32,
                next_player_id: next_player.id,
                next_player_is_ai,
            },
            player_count: count,
        })
    }
}
