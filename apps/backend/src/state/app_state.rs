use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::ai::{AiExecutor, IdleExecutor};
use crate::domain::rules;
use crate::domain::tracks::{RailNetwork, TrackGraph};
use crate::services::decks::CardDecks;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Process-wide demand-card decks
    pub decks: CardDecks,
    /// Track network query implementation
    pub network: Arc<dyn TrackGraph>,
    /// AI turn executor invoked by the coordinator's background chain
    pub executor: Arc<dyn AiExecutor>,
    /// Wall-clock budget for one AI turn
    pub ai_deadline: Duration,
}

impl AppState {
    /// Create a new AppState with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db: Some(db),
            ..Self::without_db()
        }
    }

    /// Create a new AppState without a database connection (for testing)
    pub fn without_db() -> Self {
        Self {
            db: None,
            decks: CardDecks::new(),
            network: Arc::new(RailNetwork),
            executor: Arc::new(IdleExecutor),
            ai_deadline: rules::AI_TURN_DEADLINE,
        }
    }

    pub fn with_executor(mut self, executor: Arc<dyn AiExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_network(mut self, network: Arc<dyn TrackGraph>) -> Self {
        self.network = network;
        self
    }

    pub fn with_ai_deadline(mut self, deadline: Duration) -> Self {
        self.ai_deadline = deadline;
        self
    }
}
