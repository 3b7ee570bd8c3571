//! Pure domain logic: board coordinates, demand cards, game constants and
//! the track network query. No persistence concerns here.

pub mod cards;
pub mod coords;
pub mod rules;
pub mod tracks;

pub use cards::{card_by_id, demand_for, standard_deck, Demand, DemandCard, LoadKind};
pub use coords::Coord;
pub use tracks::{OwnedSegment, RailNetwork, TrackError, TrackGraph, TrackUsage};
