//! DTOs for games_sea adapter.

/// DTO for creating a new game.
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub created_by: Option<i64>,
    pub name: Option<String>,
    pub rng_seed: i64,
}

impl GameCreate {
    pub fn new(rng_seed: i64) -> Self {
        Self {
            created_by: None,
            name: None,
            rng_seed,
        }
    }

    pub fn with_created_by(mut self, user_id: i64) -> Self {
        self.created_by = Some(user_id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
