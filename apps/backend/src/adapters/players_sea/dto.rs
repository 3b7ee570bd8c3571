//! DTOs for players_sea adapter.

use crate::entities::game_players::{PlayerKind, TrainKind};

/// DTO for creating a new game player.
#[derive(Debug, Clone)]
pub struct PlayerCreate {
    pub game_id: i64,
    pub user_id: i64,
    pub player_kind: PlayerKind,
    pub turn_order: i32,
    pub money: i64,
    pub train_kind: TrainKind,
}

impl PlayerCreate {
    pub fn new(
        game_id: i64,
        user_id: i64,
        player_kind: PlayerKind,
        turn_order: i32,
        money: i64,
        train_kind: TrainKind,
    ) -> Self {
        Self {
            game_id,
            user_id,
            player_kind,
            turn_order,
            money,
            train_kind,
        }
    }
}
