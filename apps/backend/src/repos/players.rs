//! Player repository functions for domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::players_sea as players_adapter;
use crate::domain::cards::LoadKind;
use crate::domain::coords::Coord;
use crate::domain::rules;
use crate::entities::game_players;
use crate::entities::game_players::{PlayerKind, TrainKind};
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};

/// Player domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: i64,
    pub game_id: i64,
    pub user_id: i64,
    pub kind: PlayerKind,
    pub turn_order: i32,
    pub money: i64,
    pub train: TrainKind,
    pub position: Option<Coord>,
    pub loads: Vec<LoadKind>,
    pub hand: Vec<i64>,
    pub turn_no: i32,
}

impl Player {
    /// How many loads this player's train can carry.
    pub fn capacity(&self) -> usize {
        rules::train_capacity(self.train)
    }
}

fn from_model(model: game_players::Model) -> Result<Player, DomainError> {
    let position = match (model.pos_row, model.pos_col) {
        (Some(row), Some(col)) => Some(Coord::new(row, col)),
        (None, None) => None,
        _ => {
            return Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("player {} has a half-set position", model.id),
            ))
        }
    };
    let loads: Vec<LoadKind> = serde_json::from_value(model.loads).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("player {} loads column: {e}", model.id),
        )
    })?;
    let hand: Vec<i64> = serde_json::from_value(model.hand).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("player {} hand column: {e}", model.id),
        )
    })?;

    Ok(Player {
        id: model.id,
        game_id: model.game_id,
        user_id: model.user_id,
        kind: model.player_kind,
        turn_order: model.turn_order,
        money: model.money,
        train: model.train_kind,
        position,
        loads,
        hand,
        turn_no: model.turn_no,
    })
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<Player>, DomainError> {
    let player = players_adapter::find_by_id(conn, player_id).await?;
    player.map(from_model).transpose()
}

pub async fn require_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Player, DomainError> {
    find_by_id(conn, player_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("player {player_id}")))
}

/// All players of a game, ordered by turn order.
pub async fn find_all_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<Player>, DomainError> {
    let players = players_adapter::find_all_by_game(conn, game_id).await?;
    players.into_iter().map(from_model).collect()
}

pub async fn find_by_game_and_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<Option<Player>, DomainError> {
    let player = players_adapter::find_by_game_and_user(conn, game_id, user_id).await?;
    player.map(from_model).transpose()
}

/// Locked variant used by the mutation guard.
pub async fn find_by_game_and_user_for_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<Option<Player>, DomainError> {
    let player = players_adapter::find_by_game_and_user_for_update(conn, game_id, user_id).await?;
    player.map(from_model).transpose()
}

pub async fn create_player(
    txn: &DatabaseTransaction,
    dto: players_adapter::PlayerCreate,
) -> Result<Player, DomainError> {
    let player = players_adapter::create_player(txn, dto).await?;
    from_model(player)
}

pub async fn set_position(
    txn: &DatabaseTransaction,
    player_id: i64,
    position: Option<Coord>,
) -> Result<Player, DomainError> {
    let player =
        players_adapter::set_position(txn, player_id, position.map(|c| (c.row, c.col))).await?;
    from_model(player)
}

pub async fn set_hand(
    txn: &DatabaseTransaction,
    player_id: i64,
    hand: &[i64],
) -> Result<Player, DomainError> {
    let value = serde_json::to_value(hand).map_err(|e| {
        DomainError::infra(InfraErrorKind::Other("serde".into()), e.to_string())
    })?;
    let player = players_adapter::set_hand(txn, player_id, value).await?;
    from_model(player)
}

pub async fn set_loads(
    txn: &DatabaseTransaction,
    player_id: i64,
    loads: &[LoadKind],
) -> Result<Player, DomainError> {
    let value = serde_json::to_value(loads).map_err(|e| {
        DomainError::infra(InfraErrorKind::Other("serde".into()), e.to_string())
    })?;
    let player = players_adapter::set_loads(txn, player_id, value).await?;
    from_model(player)
}

/// Atomically add `delta` (may be negative) to a player's money.
pub async fn adjust_money(
    txn: &DatabaseTransaction,
    player_id: i64,
    delta: i64,
) -> Result<(), DomainError> {
    players_adapter::adjust_money(txn, player_id, delta).await?;
    Ok(())
}

pub async fn increment_turn_no(
    txn: &DatabaseTransaction,
    player_id: i64,
) -> Result<(), DomainError> {
    players_adapter::increment_turn_no(txn, player_id).await?;
    Ok(())
}
