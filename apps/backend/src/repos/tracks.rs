//! Track ownership reads (and setup-time writes) for the domain layer.
//!
//! The turn engine never mutates track during a turn; segments are read
//! here and handed to the `TrackGraph` query.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::tracks_sea as tracks_adapter;
use crate::domain::coords::Coord;
use crate::domain::tracks::OwnedSegment;
use crate::entities::track_segments;
use crate::errors::domain::DomainError;

fn from_model(model: track_segments::Model) -> OwnedSegment {
    OwnedSegment {
        player_id: model.player_id,
        a: Coord::new(model.from_row, model.from_col),
        b: Coord::new(model.to_row, model.to_col),
    }
}

pub async fn find_all_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<OwnedSegment>, DomainError> {
    let segments = tracks_adapter::find_all_by_game(conn, game_id).await?;
    Ok(segments.into_iter().map(from_model).collect())
}

pub async fn create_segment(
    txn: &DatabaseTransaction,
    game_id: i64,
    player_id: i64,
    a: Coord,
    b: Coord,
) -> Result<OwnedSegment, DomainError> {
    let segment =
        tracks_adapter::insert_segment(txn, game_id, player_id, (a.row, a.col), (b.row, b.col))
            .await?;
    Ok(from_model(segment))
}
