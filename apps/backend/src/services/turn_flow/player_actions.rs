//! Guarded player actions: deliver a load, move the train, discard the
//! hand, restart after a derailment, and undo the most recent action.
//!
//! Public methods own the guard envelope; `*_in_txn` internals do the
//! validation and mutation against an already-verified [`ActiveTurn`].

use sea_orm::DatabaseTransaction;
use std::sync::Arc;
use tracing::{debug, info};

use super::guard::ActiveTurn;
use super::{fees, TurnAdvance, TurnFlowService};
use crate::domain::cards::{card_by_id, demand_for, LoadKind};
use crate::domain::coords::Coord;
use crate::domain::rules;
use crate::domain::tracks::TrackGraph;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, ValidationKind};
use crate::repos::actions::{ActionRecord, OwnerPayment};
use crate::repos::{actions, players};
use crate::services::decks::DeckJournal;
use crate::state::app_state::AppState;

#[derive(Debug, Clone, PartialEq)]
pub struct DeliverOutcome {
    pub payment: i64,
    pub updated_money: i64,
    pub updated_loads: Vec<LoadKind>,
    pub new_card: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub fee_total: i64,
    pub owners_used: Vec<i64>,
    pub owners_paid: Vec<i64>,
    /// Every player whose money this move changed (payer included).
    pub affected_player_ids: Vec<i64>,
    pub updated_position: Coord,
    pub updated_money: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscardOutcome {
    pub new_hand: Vec<i64>,
    pub advance: TurnAdvance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestartOutcome {
    pub loads_dropped: Vec<LoadKind>,
}

/// Undo result, discriminated by the kind of the reversed entry.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    Deliver {
        card_restored: i64,
        card_returned: i64,
        payment_reversed: i64,
        updated_money: i64,
    },
    Move {
        restored_position: Option<Coord>,
        fee_refunded: i64,
        opponents_reversed: Vec<i64>,
        updated_money: i64,
    },
}

impl TurnFlowService {
    /// Deliver a carried load to a city against a demand card in hand.
    pub async fn deliver_load(
        &self,
        state: &AppState,
        game_id: i64,
        user_id: i64,
        city: &str,
        load: LoadKind,
        card_id: i64,
    ) -> Result<DeliverOutcome, AppError> {
        let journal = DeckJournal::new(&state.decks, game_id);
        let op_journal = journal.clone();
        let city = city.to_string();
        self.run_guarded(state, game_id, user_id, &journal, move |txn, turn| {
            Box::pin(async move {
                TurnFlowService::deliver_in_txn(txn, &op_journal, turn, city, load, card_id).await
            })
        })
        .await
    }

    async fn deliver_in_txn(
        txn: &DatabaseTransaction,
        journal: &DeckJournal,
        turn: ActiveTurn,
        city: String,
        load: LoadKind,
        card_id: i64,
    ) -> Result<DeliverOutcome, AppError> {
        let player = &turn.player;
        debug!(
            game_id = turn.game.id,
            player_id = player.id,
            card_id,
            city = %city,
            "delivering load"
        );

        let slot = player.hand.iter().position(|c| *c == card_id).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::CardNotInHand,
                format!("card {card_id} is not in the player's hand"),
            )
        })?;
        let card = card_by_id(card_id).ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("card {card_id} missing from the catalog"),
            )
        })?;
        let demand = demand_for(card, &city, load).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::DemandMismatch,
                format!("card {card_id} has no demand for {load:?} at {city}"),
            )
        })?;
        let load_idx = player.loads.iter().position(|l| *l == load).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::LoadNotOnTrain,
                format!("{load:?} is not on the train"),
            )
        })?;

        let new_card = journal.draw_card().ok_or_else(|| {
            DomainError::conflict(ConflictKind::DeckExhausted, "draw pile is empty")
        })?;

        let mut hand = player.hand.clone();
        hand[slot] = new_card;
        let mut loads = player.loads.clone();
        loads.remove(load_idx);
        let payment = demand.payment;

        players::set_hand(txn, player.id, &hand).await?;
        players::set_loads(txn, player.id, &loads).await?;
        players::adjust_money(txn, player.id, payment).await?;
        journal.discard_card(card_id);

        let record = ActionRecord::Deliver {
            city: city.clone(),
            load,
            card_consumed: card_id,
            card_drawn: new_card,
            payment,
        };
        actions::append(txn, turn.game.id, player.id, player.turn_no, &record).await?;

        info!(
            game_id = turn.game.id,
            player_id = player.id,
            city = %city,
            ?load,
            payment,
            "load delivered"
        );

        Ok(DeliverOutcome {
            payment,
            updated_money: player.money + payment,
            updated_loads: loads,
            new_card,
        })
    }

    /// Move the train to a new milepost, settling track-usage fees.
    pub async fn move_train(
        &self,
        state: &AppState,
        game_id: i64,
        user_id: i64,
        to: Coord,
    ) -> Result<MoveOutcome, AppError> {
        let journal = DeckJournal::new(&state.decks, game_id);
        let network = state.network.clone();
        self.run_guarded(state, game_id, user_id, &journal, move |txn, turn| {
            Box::pin(async move { TurnFlowService::move_in_txn(txn, network, turn, to).await })
        })
        .await
    }

    async fn move_in_txn(
        txn: &DatabaseTransaction,
        network: Arc<dyn TrackGraph>,
        turn: ActiveTurn,
        to: Coord,
    ) -> Result<MoveOutcome, AppError> {
        let player = &turn.player;
        let from = player.position;
        debug!(
            game_id = turn.game.id,
            player_id = player.id,
            ?from,
            %to,
            "moving train"
        );

        let fee = fees::settle_move_fee(txn, network.as_ref(), &turn, from, to).await?;

        players::set_position(txn, player.id, Some(to)).await?;

        let record = ActionRecord::Move {
            from,
            to,
            owners_paid: fee.owners_paid.clone(),
            fee_total: fee.fee_total,
        };
        actions::append(txn, turn.game.id, player.id, player.turn_no, &record).await?;

        let owners_paid: Vec<i64> = fee.owners_paid.iter().map(|p| p.player_id).collect();
        let mut affected_player_ids = owners_paid.clone();
        if fee.fee_total > 0 {
            affected_player_ids.push(player.id);
        }

        info!(
            game_id = turn.game.id,
            player_id = player.id,
            %to,
            fee_total = fee.fee_total,
            "train moved"
        );

        Ok(MoveOutcome {
            fee_total: fee.fee_total,
            owners_used: fee.owners_used,
            owners_paid,
            affected_player_ids,
            updated_position: to,
            updated_money: player.money - fee.fee_total,
        })
    }

    /// Trade the whole hand for a fresh one. Only legal before any action
    /// has been committed this turn; ends the turn.
    pub async fn discard_hand(
        &self,
        state: &AppState,
        game_id: i64,
        user_id: i64,
    ) -> Result<DiscardOutcome, AppError> {
        let journal = DeckJournal::new(&state.decks, game_id);
        let op_journal = journal.clone();
        let new_hand = self
            .run_guarded(state, game_id, user_id, &journal, move |txn, turn| {
                Box::pin(
                    async move { TurnFlowService::discard_hand_in_txn(txn, &op_journal, turn).await },
                )
            })
            .await?;

        // The fresh hand belongs to a fresh turn; hand the game onward.
        let advance = self.end_turn(state, game_id).await?;
        Ok(DiscardOutcome { new_hand, advance })
    }

    async fn discard_hand_in_txn(
        txn: &DatabaseTransaction,
        journal: &DeckJournal,
        turn: ActiveTurn,
    ) -> Result<Vec<i64>, AppError> {
        let player = &turn.player;

        let committed = actions::count_for_turn(txn, player.id, player.turn_no).await?;
        if committed > 0 {
            return Err(DomainError::validation(
                ValidationKind::TurnAlreadyActed,
                "hand can only be discarded before acting this turn",
            )
            .into());
        }

        for card in &player.hand {
            journal.discard_card(*card);
        }

        let mut new_hand = Vec::with_capacity(rules::HAND_SIZE);
        for _ in 0..rules::HAND_SIZE {
            let card = journal.draw_card().ok_or_else(|| {
                DomainError::conflict(ConflictKind::DeckExhausted, "draw pile is empty")
            })?;
            new_hand.push(card);
        }

        players::set_hand(txn, player.id, &new_hand).await?;
        players::increment_turn_no(txn, player.id).await?;

        info!(
            game_id = turn.game.id,
            player_id = player.id,
            "hand discarded and redrawn"
        );
        Ok(new_hand)
    }

    /// Derailment recovery: clear the train's position and jettison its
    /// loads. Not undoable and appends no ledger entry.
    pub async fn restart_player(
        &self,
        state: &AppState,
        game_id: i64,
        user_id: i64,
    ) -> Result<RestartOutcome, AppError> {
        let journal = DeckJournal::new(&state.decks, game_id);
        self.run_guarded(state, game_id, user_id, &journal, move |txn, turn| {
            Box::pin(async move { TurnFlowService::restart_in_txn(txn, turn).await })
        })
        .await
    }

    async fn restart_in_txn(
        txn: &DatabaseTransaction,
        turn: ActiveTurn,
    ) -> Result<RestartOutcome, AppError> {
        let player = &turn.player;

        players::set_position(txn, player.id, None).await?;
        players::set_loads(txn, player.id, &[]).await?;

        info!(
            game_id = turn.game.id,
            player_id = player.id,
            loads_dropped = player.loads.len(),
            "player restarted"
        );
        Ok(RestartOutcome {
            loads_dropped: player.loads.clone(),
        })
    }

    /// Undo the single most recent action of the current turn. Chained
    /// undo is repeated calls; each reverses exactly one ledger entry.
    pub async fn undo_last_action(
        &self,
        state: &AppState,
        game_id: i64,
        user_id: i64,
    ) -> Result<UndoOutcome, AppError> {
        let journal = DeckJournal::new(&state.decks, game_id);
        let op_journal = journal.clone();
        self.run_guarded(state, game_id, user_id, &journal, move |txn, turn| {
            Box::pin(async move { TurnFlowService::undo_in_txn(txn, &op_journal, turn).await })
        })
        .await
    }

    async fn undo_in_txn(
        txn: &DatabaseTransaction,
        journal: &DeckJournal,
        turn: ActiveTurn,
    ) -> Result<UndoOutcome, AppError> {
        let player = &turn.player;

        let entry = actions::last_entry(txn, player.id, player.turn_no)
            .await?
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::NoUndoableAction,
                    "no committed action to undo this turn",
                )
            })?;

        let outcome = match entry.record.clone() {
            ActionRecord::Deliver {
                load,
                card_consumed,
                card_drawn,
                payment,
                ..
            } => {
                Self::undo_deliver(
                    txn,
                    journal,
                    &turn,
                    load,
                    card_consumed,
                    card_drawn,
                    payment,
                )
                .await?
            }
            ActionRecord::Move {
                from,
                owners_paid,
                fee_total,
                ..
            } => Self::undo_move(txn, &turn, from, owners_paid, fee_total).await?,
        };

        actions::pop_last(txn, &entry).await?;
        info!(
            game_id = turn.game.id,
            player_id = player.id,
            entry_id = entry.id,
            "last action undone"
        );
        Ok(outcome)
    }

    async fn undo_deliver(
        txn: &DatabaseTransaction,
        journal: &DeckJournal,
        turn: &ActiveTurn,
        load: LoadKind,
        card_consumed: i64,
        card_drawn: i64,
        payment: i64,
    ) -> Result<UndoOutcome, AppError> {
        let player = &turn.player;

        if !journal.return_dealt_card_to_top(card_drawn) {
            return Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("drawn card {card_drawn} is not in the dealt set"),
            )
            .into());
        }
        if !journal.return_discarded_card_to_dealt(card_consumed) {
            return Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("consumed card {card_consumed} is not in the discard pile"),
            )
            .into());
        }

        let slot = player
            .hand
            .iter()
            .position(|c| *c == card_drawn)
            .ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("drawn card {card_drawn} missing from hand"),
                )
            })?;
        let mut hand = player.hand.clone();
        hand[slot] = card_consumed;
        let mut loads = player.loads.clone();
        loads.push(load);

        players::set_hand(txn, player.id, &hand).await?;
        players::set_loads(txn, player.id, &loads).await?;
        players::adjust_money(txn, player.id, -payment).await?;

        Ok(UndoOutcome::Deliver {
            card_restored: card_consumed,
            card_returned: card_drawn,
            payment_reversed: payment,
            updated_money: player.money - payment,
        })
    }

    async fn undo_move(
        txn: &DatabaseTransaction,
        turn: &ActiveTurn,
        from: Option<Coord>,
        owners_paid: Vec<OwnerPayment>,
        fee_total: i64,
    ) -> Result<UndoOutcome, AppError> {
        let player = &turn.player;

        for paid in &owners_paid {
            players::adjust_money(txn, paid.player_id, -paid.amount).await?;
        }
        if fee_total > 0 {
            players::adjust_money(txn, player.id, fee_total).await?;
        }
        players::set_position(txn, player.id, from).await?;

        Ok(UndoOutcome::Move {
            restored_position: from,
            fee_refunded: fee_total,
            opponents_reversed: owners_paid.iter().map(|p| p.player_id).collect(),
            updated_money: player.money + fee_total,
        })
    }
}
