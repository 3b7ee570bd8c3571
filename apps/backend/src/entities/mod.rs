pub mod game_players;
pub mod games;
pub mod track_segments;
pub mod turn_actions;
