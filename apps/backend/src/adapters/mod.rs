pub mod actions_sea;
pub mod games_sea;
pub mod players_sea;
pub mod tracks_sea;
