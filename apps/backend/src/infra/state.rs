use std::sync::Arc;
use std::time::Duration;

use crate::ai::AiExecutor;
use crate::config::db::{DbOwner, DbProfile};
use crate::domain::tracks::TrackGraph;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and binaries)
pub struct StateBuilder {
    db_profile: Option<DbProfile>,
    executor: Option<Arc<dyn AiExecutor>>,
    network: Option<Arc<dyn TrackGraph>>,
    ai_deadline: Option<Duration>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            db_profile: None,
            executor: None,
            network: None,
            ai_deadline: None,
        }
    }

    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }

    pub fn with_executor(mut self, executor: Arc<dyn AiExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_network(mut self, network: Arc<dyn TrackGraph>) -> Self {
        self.network = Some(network);
        self
    }

    pub fn with_ai_deadline(mut self, deadline: Duration) -> Self {
        self.ai_deadline = Some(deadline);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let mut state = if let Some(profile) = self.db_profile {
            // single entrypoint: build + migrate
            let conn = bootstrap_db(profile, DbOwner::App).await?;
            AppState::new(conn)
        } else {
            AppState::without_db()
        };

        if let Some(executor) = self.executor {
            state = state.with_executor(executor);
        }
        if let Some(network) = self.network {
            state = state.with_network(network);
        }
        if let Some(deadline) = self.ai_deadline {
            state = state.with_ai_deadline(deadline);
        }
        Ok(state)
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
