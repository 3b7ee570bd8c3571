//! SeaORM adapter for the per-turn action ledger - generic over ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::turn_actions;

pub mod dto;

pub use dto::ActionInsert;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn insert_action(
    txn: &DatabaseTransaction,
    dto: ActionInsert,
) -> Result<turn_actions::Model, sea_orm::DbErr> {
    let action_active = turn_actions::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        player_id: Set(dto.player_id),
        turn_no: Set(dto.turn_no),
        kind: Set(dto.kind),
        payload: Set(dto.payload),
        created_at: Set(OffsetDateTime::now_utc()),
    };
    action_active.insert(txn).await
}

/// Most recent ledger entry of the given turn, if any.
pub async fn find_last<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    turn_no: i32,
) -> Result<Option<turn_actions::Model>, sea_orm::DbErr> {
    turn_actions::Entity::find()
        .filter(turn_actions::Column::PlayerId.eq(player_id))
        .filter(turn_actions::Column::TurnNo.eq(turn_no))
        .order_by_desc(turn_actions::Column::Id)
        .one(conn)
        .await
}

pub async fn find_by_kind<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    turn_no: i32,
    kind: turn_actions::ActionKind,
) -> Result<Vec<turn_actions::Model>, sea_orm::DbErr> {
    turn_actions::Entity::find()
        .filter(turn_actions::Column::PlayerId.eq(player_id))
        .filter(turn_actions::Column::TurnNo.eq(turn_no))
        .filter(turn_actions::Column::Kind.eq(kind))
        .order_by_asc(turn_actions::Column::Id)
        .all(conn)
        .await
}

pub async fn count_for_turn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    turn_no: i32,
) -> Result<u64, sea_orm::DbErr> {
    turn_actions::Entity::find()
        .filter(turn_actions::Column::PlayerId.eq(player_id))
        .filter(turn_actions::Column::TurnNo.eq(turn_no))
        .count(conn)
        .await
}

pub async fn delete_by_id(
    txn: &DatabaseTransaction,
    action_id: i64,
) -> Result<(), sea_orm::DbErr> {
    let result = turn_actions::Entity::delete_by_id(action_id).exec(txn).await?;
    if result.rows_affected == 0 {
        return Err(sea_orm::DbErr::RecordNotFound(
            "Ledger entry not found".to_string(),
        ));
    }
    Ok(())
}
