//! SeaORM adapter for game player rows - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbBackend, EntityTrait,
    NotSet, QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::game_players;

pub mod dto;

pub use dto::PlayerCreate;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<game_players::Model>, sea_orm::DbErr> {
    game_players::Entity::find()
        .filter(game_players::Column::Id.eq(player_id))
        .one(conn)
        .await
}

pub async fn find_all_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<game_players::Model>, sea_orm::DbErr> {
    game_players::Entity::find()
        .filter(game_players::Column::GameId.eq(game_id))
        .order_by_asc(game_players::Column::TurnOrder)
        .all(conn)
        .await
}

pub async fn find_by_game_and_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<Option<game_players::Model>, sea_orm::DbErr> {
    game_players::Entity::find()
        .filter(game_players::Column::GameId.eq(game_id))
        .filter(game_players::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

/// Find the acting player's row with an exclusive row lock.
///
/// The lock clause only exists on Postgres; SQLite's single-writer
/// connection already serializes writers and rejects `FOR UPDATE`.
pub async fn find_by_game_and_user_for_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<Option<game_players::Model>, sea_orm::DbErr> {
    let mut query = game_players::Entity::find()
        .filter(game_players::Column::GameId.eq(game_id))
        .filter(game_players::Column::UserId.eq(user_id));
    if conn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    query.one(conn).await
}

pub async fn create_player(
    txn: &DatabaseTransaction,
    dto: PlayerCreate,
) -> Result<game_players::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let player_active = game_players::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        user_id: Set(dto.user_id),
        player_kind: Set(dto.player_kind),
        turn_order: Set(dto.turn_order),
        money: Set(dto.money),
        train_kind: Set(dto.train_kind),
        pos_row: Set(None),
        pos_col: Set(None),
        loads: Set(serde_json::json!([])),
        hand: Set(serde_json::json!([])),
        turn_no: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    player_active.insert(txn).await
}

pub async fn set_position(
    txn: &DatabaseTransaction,
    player_id: i64,
    position: Option<(i32, i32)>,
) -> Result<game_players::Model, sea_orm::DbErr> {
    let player = game_players::ActiveModel {
        id: Set(player_id),
        pos_row: Set(position.map(|p| p.0)),
        pos_col: Set(position.map(|p| p.1)),
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    };
    player.update(txn).await
}

pub async fn set_hand(
    txn: &DatabaseTransaction,
    player_id: i64,
    hand: serde_json::Value,
) -> Result<game_players::Model, sea_orm::DbErr> {
    let player = game_players::ActiveModel {
        id: Set(player_id),
        hand: Set(hand),
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    };
    player.update(txn).await
}

pub async fn set_loads(
    txn: &DatabaseTransaction,
    player_id: i64,
    loads: serde_json::Value,
) -> Result<game_players::Model, sea_orm::DbErr> {
    let player = game_players::ActiveModel {
        id: Set(player_id),
        loads: Set(loads),
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    };
    player.update(txn).await
}

/// Atomically add `delta` (may be negative) to a player's money.
pub async fn adjust_money(
    txn: &DatabaseTransaction,
    player_id: i64,
    delta: i64,
) -> Result<(), sea_orm::DbErr> {
    let result = game_players::Entity::update_many()
        .col_expr(
            game_players::Column::Money,
            Expr::col(game_players::Column::Money).add(delta),
        )
        .col_expr(
            game_players::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .filter(game_players::Column::Id.eq(player_id))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(sea_orm::DbErr::RecordNotFound(
            "Player not found".to_string(),
        ));
    }
    Ok(())
}

/// Advance a player's personal turn counter by one.
pub async fn increment_turn_no(
    txn: &DatabaseTransaction,
    player_id: i64,
) -> Result<(), sea_orm::DbErr> {
    let result = game_players::Entity::update_many()
        .col_expr(
            game_players::Column::TurnNo,
            Expr::col(game_players::Column::TurnNo).add(1),
        )
        .col_expr(
            game_players::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .filter(game_players::Column::Id.eq(player_id))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(sea_orm::DbErr::RecordNotFound(
            "Player not found".to_string(),
        ));
    }
    Ok(())
}
