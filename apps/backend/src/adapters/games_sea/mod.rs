//! SeaORM adapter for game rows - generic over ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbBackend, EntityTrait,
    NotSet, QueryFilter, QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::games;

pub mod dto;

pub use dto::GameCreate;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .filter(games::Column::Id.eq(game_id))
        .one(conn)
        .await
}

/// Find game by ID or return RecordNotFound error.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<games::Model, sea_orm::DbErr> {
    find_by_id(conn, game_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Game not found".to_string()))
}

/// Find game by ID with an exclusive row lock.
///
/// The lock clause only exists on Postgres; SQLite's single-writer
/// connection already serializes writers and rejects `FOR UPDATE`.
pub async fn find_by_id_for_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    let mut query = games::Entity::find().filter(games::Column::Id.eq(game_id));
    if conn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    query.one(conn).await
}

pub async fn create_game(
    txn: &DatabaseTransaction,
    dto: GameCreate,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let game_active = games::ActiveModel {
        id: NotSet,
        created_by: Set(dto.created_by),
        name: Set(dto.name),
        status: Set(games::GameStatus::Lobby),
        current_player_index: Set(0),
        rng_seed: Set(dto.rng_seed),
        created_at: Set(now),
        updated_at: Set(now),
        started_at: Set(None),
    };
    game_active.insert(txn).await
}

pub async fn set_status(
    txn: &DatabaseTransaction,
    game_id: i64,
    status: games::GameStatus,
    started_at: Option<OffsetDateTime>,
) -> Result<games::Model, sea_orm::DbErr> {
    let game = games::ActiveModel {
        id: Set(game_id),
        status: Set(status),
        started_at: match started_at {
            Some(t) => Set(Some(t)),
            None => NotSet,
        },
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    };
    game.update(txn).await
}

pub async fn set_current_player_index(
    txn: &DatabaseTransaction,
    game_id: i64,
    index: i32,
) -> Result<games::Model, sea_orm::DbErr> {
    let game = games::ActiveModel {
        id: Set(game_id),
        current_player_index: Set(index),
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    };
    game.update(txn).await
}
