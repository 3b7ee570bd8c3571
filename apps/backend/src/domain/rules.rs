//! Game constants and small rule helpers.

use std::time::Duration;

use crate::entities::game_players::TrainKind;

/// Flat fee charged per opponent whose track a move traverses, at most once
/// per opponent per turn.
pub const TRACK_USE_FEE: i64 = 4;

/// Fixed hand size of demand cards.
pub const HAND_SIZE: usize = 3;

/// Money each player starts with.
pub const STARTING_MONEY: i64 = 50;

/// Minimum players required to start a game.
pub const MIN_PLAYERS_TO_START: usize = 2;

/// Wall-clock budget for a single AI turn before the coordinator moves on.
pub const AI_TURN_DEADLINE: Duration = Duration::from_secs(30);

/// Load capacity of a train.
pub fn train_capacity(kind: TrainKind) -> usize {
    match kind {
        TrainKind::Freight | TrainKind::FastFreight => 2,
        TrainKind::HeavyFreight | TrainKind::SuperFreight => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacities_are_bounded() {
        assert_eq!(train_capacity(TrainKind::Freight), 2);
        assert_eq!(train_capacity(TrainKind::FastFreight), 2);
        assert_eq!(train_capacity(TrainKind::HeavyFreight), 3);
        assert_eq!(train_capacity(TrainKind::SuperFreight), 3);
    }
}
