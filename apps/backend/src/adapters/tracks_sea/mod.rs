//! SeaORM adapter for track segment rows (read-only to the turn engine;
//! writes exist for board setup and tests).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, NotSet,
    QueryFilter, Set,
};
use time::OffsetDateTime;

use crate::entities::track_segments;

pub async fn find_all_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<track_segments::Model>, sea_orm::DbErr> {
    track_segments::Entity::find()
        .filter(track_segments::Column::GameId.eq(game_id))
        .all(conn)
        .await
}

pub async fn insert_segment(
    txn: &DatabaseTransaction,
    game_id: i64,
    player_id: i64,
    from: (i32, i32),
    to: (i32, i32),
) -> Result<track_segments::Model, sea_orm::DbErr> {
    let segment_active = track_segments::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        player_id: Set(player_id),
        from_row: Set(from.0),
        from_col: Set(from.1),
        to_row: Set(to.0),
        to_col: Set(to.1),
        created_at: Set(OffsetDateTime::now_utc()),
    };
    segment_active.insert(txn).await
}
