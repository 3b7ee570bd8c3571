//! Game repository functions for domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use time::OffsetDateTime;

use crate::adapters::games_sea as games_adapter;
use crate::entities::games;
use crate::entities::games::GameStatus;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Game domain model
///
/// Converted from the database model (games::Model) when loaded through
/// repos functions.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: i64,
    pub created_by: Option<i64>,
    pub name: Option<String>,
    pub status: GameStatus,
    pub current_player_index: i32,
    pub rng_seed: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub started_at: Option<OffsetDateTime>,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<Game>, DomainError> {
    let game = games_adapter::find_by_id(conn, game_id).await?;
    Ok(game.map(Game::from))
}

/// Find game by ID or return a domain not-found error.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Game, DomainError> {
    let game = games_adapter::find_by_id(conn, game_id).await?;
    game.map(Game::from)
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Game, format!("game {game_id}")))
}

/// Find game by ID under an exclusive row lock, or return not-found.
///
/// This is the serialization point for turn-pointer updates: two
/// concurrent mutations on the same game queue up behind this lock.
pub async fn require_game_for_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Game, DomainError> {
    let game = games_adapter::find_by_id_for_update(conn, game_id).await?;
    game.map(Game::from)
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Game, format!("game {game_id}")))
}

pub async fn create_game(
    txn: &DatabaseTransaction,
    dto: games_adapter::GameCreate,
) -> Result<Game, DomainError> {
    let game = games_adapter::create_game(txn, dto).await?;
    Ok(Game::from(game))
}

pub async fn set_status(
    txn: &DatabaseTransaction,
    game_id: i64,
    status: GameStatus,
    started_at: Option<OffsetDateTime>,
) -> Result<Game, DomainError> {
    let game = games_adapter::set_status(txn, game_id, status, started_at).await?;
    Ok(Game::from(game))
}

pub async fn set_current_player_index(
    txn: &DatabaseTransaction,
    game_id: i64,
    index: i32,
) -> Result<Game, DomainError> {
    let game = games_adapter::set_current_player_index(txn, game_id, index).await?;
    Ok(Game::from(game))
}

// Conversions between SeaORM models and domain models

impl From<games::Model> for Game {
    fn from(model: games::Model) -> Self {
        Self {
            id: model.id,
            created_by: model.created_by,
            name: model.name,
            status: model.status,
            current_player_index: model.current_player_index,
            rng_seed: model.rng_seed,
            created_at: model.created_at,
            updated_at: model.updated_at,
            started_at: model.started_at,
        }
    }
}
