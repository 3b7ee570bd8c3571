pub mod actions;
pub mod games;
pub mod players;
pub mod tracks;
