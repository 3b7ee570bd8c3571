//! Track-usage fee settlement.
//!
//! A move that runs over opponents' track owes each of them a flat fee, at
//! most once per opponent per turn. De-duplication diffs the network's
//! owner set against the opponents already paid in this turn's ledger.

use sea_orm::DatabaseTransaction;
use tracing::info;

use super::guard::ActiveTurn;
use crate::domain::coords::Coord;
use crate::domain::rules;
use crate::domain::tracks::TrackGraph;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::actions::OwnerPayment;
use crate::repos::{actions, players, tracks};

/// Outcome of fee settlement for one move.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct MoveFee {
    /// Every opponent whose track the move traversed.
    pub owners_used: Vec<i64>,
    /// The subset charged by this move (not yet paid this turn).
    pub owners_paid: Vec<OwnerPayment>,
    pub fee_total: i64,
}

/// Validate the move against the track network and transfer fees.
///
/// Debits the payer once and credits each newly payable opponent
/// individually, all inside the caller's transaction.
pub(super) async fn settle_move_fee(
    txn: &DatabaseTransaction,
    network: &dyn TrackGraph,
    turn: &ActiveTurn,
    from: Option<Coord>,
    to: Coord,
) -> Result<MoveFee, AppError> {
    // First placement and standing still owe nothing.
    let Some(from) = from else {
        return Ok(MoveFee::default());
    };
    if from == to {
        return Ok(MoveFee::default());
    }

    let segments = tracks::find_all_by_game(txn, turn.game.id).await?;
    let usage = network
        .compute_track_usage(&segments, from, to, turn.player.id)
        .map_err(|e| {
            DomainError::validation(ValidationKind::InvalidMove, e.to_string())
        })?;

    let already_paid =
        actions::paid_opponents_this_turn(txn, turn.player.id, turn.player.turn_no).await?;
    let newly_payable: Vec<i64> = usage
        .owners_used
        .iter()
        .copied()
        .filter(|owner| !already_paid.contains(owner))
        .collect();

    let fee_total = newly_payable.len() as i64 * rules::TRACK_USE_FEE;
    if fee_total > 0 {
        if turn.player.money < fee_total {
            return Err(DomainError::validation(
                ValidationKind::InsufficientFunds,
                format!(
                    "track fee {fee_total} exceeds available funds {}",
                    turn.player.money
                ),
            )
            .into());
        }

        players::adjust_money(txn, turn.player.id, -fee_total).await?;
        for owner in &newly_payable {
            players::adjust_money(txn, *owner, rules::TRACK_USE_FEE).await?;
        }
        info!(
            game_id = turn.game.id,
            payer_id = turn.player.id,
            fee_total,
            opponents = newly_payable.len(),
            "track usage fees settled"
        );
    }

    Ok(MoveFee {
        owners_used: usage.owners_used.into_iter().collect(),
        owners_paid: newly_payable
            .into_iter()
            .map(|player_id| OwnerPayment {
                player_id,
                amount: rules::TRACK_USE_FEE,
            })
            .collect(),
        fee_total,
    })
}
