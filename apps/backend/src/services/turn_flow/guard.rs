//! The transactional envelope around player-initiated mutations.
//!
//! Contract: exclusive row locks on the game and the acting player for the
//! duration of one transaction, turn-ownership validation against the
//! re-read turn pointer, and deck compensation when the transaction fails.

use std::future::Future;
use std::pin::Pin;

use sea_orm::DatabaseTransaction;
use tracing::debug;

use super::TurnFlowService;
use crate::db::txn::with_txn;
use crate::entities::games::GameStatus;
use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
use crate::repos::games::Game;
use crate::repos::players::Player;
use crate::repos::{games, players};
use crate::services::decks::DeckJournal;
use crate::state::app_state::AppState;

/// The resolved acting context: the locked game, the locked acting player
/// and the full ordered player list.
#[derive(Debug, Clone)]
pub struct ActiveTurn {
    pub game: Game,
    pub player: Player,
    pub players: Vec<Player>,
}

/// Lock the game and the acting player, then verify the actor owns the
/// current turn.
pub(super) async fn require_active_player(
    txn: &DatabaseTransaction,
    game_id: i64,
    user_id: i64,
) -> Result<ActiveTurn, AppError> {
    let game = games::require_game_for_update(txn, game_id).await?;
    if game.status != GameStatus::Active {
        return Err(DomainError::validation(
            ValidationKind::GameNotActive,
            format!("game {game_id} is not active"),
        )
        .into());
    }

    let player = players::find_by_game_and_user_for_update(txn, game_id, user_id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Player,
                format!("user {user_id} has no player in game {game_id}"),
            )
        })?;

    let players = players::find_all_by_game(txn, game_id).await?;
    if players.is_empty() {
        return Err(DomainError::not_found(
            NotFoundKind::Players,
            format!("game {game_id} has no players"),
        )
        .into());
    }

    let index = game.current_player_index as usize;
    let active = players.get(index).ok_or_else(|| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("current_player_index {index} out of range for game {game_id}"),
        )
    })?;

    if active.id != player.id {
        return Err(DomainError::validation(
            ValidationKind::NotYourTurn,
            format!(
                "player {} acted but player {} is active",
                player.id, active.id
            ),
        )
        .into());
    }

    Ok(ActiveTurn {
        game,
        player,
        players,
    })
}

impl TurnFlowService {
    /// Run one guarded mutation: transaction + locks + ownership check,
    /// with the deck journal unwound on any failure (including a failed
    /// commit) so the non-transactional deck never drifts from the
    /// rolled-back relational state.
    pub(super) async fn run_guarded<R, F>(
        &self,
        state: &AppState,
        game_id: i64,
        user_id: i64,
        journal: &DeckJournal,
        op: F,
    ) -> Result<R, AppError>
    where
        R: Send + 'static,
        F: for<'c> FnOnce(
                &'c DatabaseTransaction,
                ActiveTurn,
            )
                -> Pin<Box<dyn Future<Output = Result<R, AppError>> + Send + 'c>>
            + Send
            + 'static,
    {
        let result = with_txn(None, state, |txn| {
            Box::pin(async move {
                let turn = require_active_player(txn, game_id, user_id).await?;
                debug!(
                    game_id,
                    user_id,
                    player_id = turn.player.id,
                    turn_no = turn.player.turn_no,
                    "turn ownership verified"
                );
                op(txn, turn).await
            })
        })
        .await;

        if let Err(ref err) = result {
            debug!(game_id, user_id, error = %err, "guarded mutation failed; compensating deck");
            journal.unwind();
        }
        result
    }
}
