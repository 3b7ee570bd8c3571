//! The per-turn action ledger.
//!
//! One row per committed player action, scoped to
//! `(player_id, game_id, turn_no)`. Entries are appended inside the same
//! transaction as the mutation they record, popped only by undo, and
//! superseded (not deleted) when the player's turn counter advances.

use std::collections::BTreeSet;

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use serde::{Deserialize, Serialize};

use crate::adapters::actions_sea as actions_adapter;
use crate::domain::cards::LoadKind;
use crate::domain::coords::Coord;
use crate::entities::turn_actions;
use crate::entities::turn_actions::ActionKind;
use crate::errors::domain::{DomainError, InfraErrorKind};

/// One `(opponent, amount)` transfer made by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerPayment {
    pub player_id: i64,
    pub amount: i64,
}

/// The committed, undoable record of one player action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionRecord {
    Deliver {
        city: String,
        load: LoadKind,
        card_consumed: i64,
        card_drawn: i64,
        payment: i64,
    },
    Move {
        /// None only for the first placement of the train.
        from: Option<Coord>,
        to: Coord,
        owners_paid: Vec<OwnerPayment>,
        fee_total: i64,
    },
}

impl ActionRecord {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionRecord::Deliver { .. } => ActionKind::Deliver,
            ActionRecord::Move { .. } => ActionKind::Move,
        }
    }
}

/// Ledger entry domain model.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub id: i64,
    pub game_id: i64,
    pub player_id: i64,
    pub turn_no: i32,
    pub record: ActionRecord,
}

fn from_model(model: turn_actions::Model) -> Result<LedgerEntry, DomainError> {
    let record: ActionRecord = serde_json::from_value(model.payload).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("ledger entry {} payload: {e}", model.id),
        )
    })?;
    Ok(LedgerEntry {
        id: model.id,
        game_id: model.game_id,
        player_id: model.player_id,
        turn_no: model.turn_no,
        record,
    })
}

/// Append one entry to the turn's ledger. Must run inside the same
/// transaction as the domain mutation it records.
pub async fn append(
    txn: &DatabaseTransaction,
    game_id: i64,
    player_id: i64,
    turn_no: i32,
    record: &ActionRecord,
) -> Result<LedgerEntry, DomainError> {
    let payload = serde_json::to_value(record)
        .map_err(|e| DomainError::infra(InfraErrorKind::Other("serde".into()), e.to_string()))?;
    let model = actions_adapter::insert_action(
        txn,
        actions_adapter::ActionInsert {
            game_id,
            player_id,
            turn_no,
            kind: record.kind(),
            payload,
        },
    )
    .await?;
    from_model(model)
}

/// Most recent entry of the turn, or none.
pub async fn last_entry<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    turn_no: i32,
) -> Result<Option<LedgerEntry>, DomainError> {
    let model = actions_adapter::find_last(conn, player_id, turn_no).await?;
    model.map(from_model).transpose()
}

/// Remove the most recent entry. Used only by undo, inside the same
/// transaction as the state reversal.
pub async fn pop_last(txn: &DatabaseTransaction, entry: &LedgerEntry) -> Result<(), DomainError> {
    actions_adapter::delete_by_id(txn, entry.id).await?;
    Ok(())
}

/// Number of committed entries in the turn.
pub async fn count_for_turn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    turn_no: i32,
) -> Result<u64, DomainError> {
    Ok(actions_adapter::count_for_turn(conn, player_id, turn_no).await?)
}

/// Union of opponents already paid by this turn's move entries.
pub async fn paid_opponents_this_turn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    turn_no: i32,
) -> Result<BTreeSet<i64>, DomainError> {
    let moves = actions_adapter::find_by_kind(conn, player_id, turn_no, ActionKind::Move).await?;
    let mut paid = BTreeSet::new();
    for model in moves {
        let entry = from_model(model)?;
        if let ActionRecord::Move { owners_paid, .. } = entry.record {
            paid.extend(owners_paid.iter().map(|p| p.player_id));
        }
    }
    Ok(paid)
}
