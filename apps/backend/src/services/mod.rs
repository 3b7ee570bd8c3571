pub mod decks;
pub mod games;
pub mod turn_flow;
