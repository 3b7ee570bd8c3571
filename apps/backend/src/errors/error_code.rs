//! Error codes for the Switchback backend.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! reported to callers.

use core::fmt;

/// Centralized error codes for the Switchback backend.
///
/// This enum ensures type safety and prevents the use of ad-hoc error codes.
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Turn ownership
    /// Acting player is not the game's active player
    NotYourTurn,

    // Action validation
    /// Card not in the player's hand
    CardNotInHand,
    /// Card carries no demand for the given city and load
    DemandMismatch,
    /// Load is not on the player's train
    LoadNotOnTrain,
    /// Move rejected by the track network
    InvalidMove,
    /// Payer cannot cover the track usage fee
    InsufficientFunds,
    /// No ledger entry to undo this turn
    NoUndoableAction,
    /// Turn already has committed actions
    TurnAlreadyActed,
    /// Game is not in the required status for this operation
    GameNotActive,
    /// Too few players to start the game
    NotEnoughPlayers,
    /// General validation error
    ValidationError,

    // Resource not found
    /// Game not found
    GameNotFound,
    /// Player not found in the game
    PlayerNotFound,
    /// Game has no players
    NoPlayersFound,
    /// General not found error
    NotFound,

    // Resource exhaustion / conflicts
    /// Draw pile is empty
    DeckExhausted,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Record not found (generic for DB-driven not-found)
    RecordNotFound,
    /// Internal server error
    InternalError,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::DemandMismatch => "DEMAND_MISMATCH",
            Self::LoadNotOnTrain => "LOAD_NOT_ON_TRAIN",
            Self::InvalidMove => "INVALID_MOVE",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::NoUndoableAction => "NO_UNDOABLE_ACTION",
            Self::TurnAlreadyActed => "TURN_ALREADY_ACTED",
            Self::GameNotActive => "GAME_NOT_ACTIVE",
            Self::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NoPlayersFound => "NO_PLAYERS_FOUND",
            Self::NotFound => "NOT_FOUND",
            Self::DeckExhausted => "DECK_EXHAUSTED",
            Self::Conflict => "CONFLICT",
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
