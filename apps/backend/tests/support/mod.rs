//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use backend::adapters::games_sea::GameCreate;
use backend::ai::{AiError, AiExecutor, TurnOutcome};
use backend::db::require_db;
use backend::db::txn::with_txn;
use backend::domain::cards::LoadKind;
use backend::domain::coords::Coord;
use backend::entities::game_players::{PlayerKind, TrainKind};
use backend::infra::state::build_state;
use backend::repos::games::Game;
use backend::repos::players::Player;
use backend::repos::{games, players, tracks};
use backend::services::games::GameService;
use backend::state::app_state::AppState;
use backend::{AppError, DbProfile};

static INIT_LOGGING: Once = Once::new();

pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("backend=debug,sqlx=warn")
            .with_test_writer()
            .try_init();
    });
}

/// Fresh in-memory state: migrated SQLite, default network, idle executor.
pub async fn build_test_state() -> Result<AppState, AppError> {
    init_logging();
    build_state().with_db(DbProfile::Test).build().await
}

/// Test state with a custom AI executor and, optionally, a short deadline.
pub async fn build_test_state_with_executor(
    executor: Arc<dyn AiExecutor>,
    deadline: Option<Duration>,
) -> Result<AppState, AppError> {
    init_logging();
    let mut builder = build_state().with_db(DbProfile::Test).with_executor(executor);
    if let Some(deadline) = deadline {
        builder = builder.with_ai_deadline(deadline);
    }
    builder.build().await
}

pub const TEST_SEED: i64 = 12345;

/// One player to create during game setup.
#[derive(Debug, Clone, Copy)]
pub struct PlayerSpec {
    pub user_id: i64,
    pub kind: PlayerKind,
    pub train: TrainKind,
}

impl PlayerSpec {
    pub fn human(user_id: i64) -> Self {
        Self {
            user_id,
            kind: PlayerKind::Human,
            train: TrainKind::Freight,
        }
    }

    pub fn ai(user_id: i64) -> Self {
        Self {
            user_id,
            kind: PlayerKind::Ai,
            train: TrainKind::Freight,
        }
    }
}

/// A started game plus its players in turn order.
pub struct TestGame {
    pub game_id: i64,
    pub players: Vec<Player>,
}

impl TestGame {
    pub fn player(&self, index: usize) -> &Player {
        &self.players[index]
    }
}

/// Create, fill and start a game with the given players.
pub async fn setup_game(state: &AppState, specs: &[PlayerSpec]) -> Result<TestGame, AppError> {
    let service = GameService;
    let game = service
        .create_game(state, GameCreate::new(TEST_SEED))
        .await?;
    for spec in specs {
        service
            .join_game(state, game.id, spec.user_id, spec.kind, spec.train)
            .await?;
    }
    service.start_game(state, game.id).await?;

    let conn = require_db(state)?;
    let players = players::find_all_by_game(conn, game.id).await?;
    Ok(TestGame {
        game_id: game.id,
        players,
    })
}

/// The most common setup: two human players (users 101, 102).
pub async fn setup_two_humans(state: &AppState) -> Result<TestGame, AppError> {
    setup_game(state, &[PlayerSpec::human(101), PlayerSpec::human(102)]).await
}

pub async fn get_game(state: &AppState, game_id: i64) -> Result<Game, AppError> {
    let conn = require_db(state)?;
    Ok(games::require_game(conn, game_id).await?)
}

pub async fn get_player(state: &AppState, player_id: i64) -> Result<Player, AppError> {
    let conn = require_db(state)?;
    Ok(players::require_player(conn, player_id).await?)
}

/// Lay track segments for a player: each pair is (from, to) grid coords.
pub async fn lay_track(
    state: &AppState,
    game_id: i64,
    player_id: i64,
    segments: Vec<((i32, i32), (i32, i32))>,
) -> Result<(), AppError> {
    with_txn(None, state, move |txn| {
        Box::pin(async move {
            for (a, b) in segments {
                tracks::create_segment(
                    txn,
                    game_id,
                    player_id,
                    Coord::new(a.0, a.1),
                    Coord::new(b.0, b.1),
                )
                .await?;
            }
            Ok(())
        })
    })
    .await
}

pub async fn set_position(
    state: &AppState,
    player_id: i64,
    position: Option<(i32, i32)>,
) -> Result<(), AppError> {
    with_txn(None, state, move |txn| {
        Box::pin(async move {
            players::set_position(txn, player_id, position.map(|p| Coord::new(p.0, p.1))).await?;
            Ok(())
        })
    })
    .await
}

pub async fn give_loads(
    state: &AppState,
    player_id: i64,
    loads: Vec<LoadKind>,
) -> Result<(), AppError> {
    with_txn(None, state, move |txn| {
        Box::pin(async move {
            players::set_loads(txn, player_id, &loads).await?;
            Ok(())
        })
    })
    .await
}

/// Replace a player's hand, keeping the process-wide deck's dealt set in
/// sync with the new hand.
pub async fn give_hand(
    state: &AppState,
    game_id: i64,
    player_id: i64,
    hand: Vec<i64>,
) -> Result<(), AppError> {
    for card in &hand {
        state.decks.ensure_dealt(game_id, *card);
    }
    with_txn(None, state, move |txn| {
        Box::pin(async move {
            players::set_hand(txn, player_id, &hand).await?;
            Ok(())
        })
    })
    .await
}

pub async fn adjust_money(
    state: &AppState,
    player_id: i64,
    delta: i64,
) -> Result<(), AppError> {
    with_txn(None, state, move |txn| {
        Box::pin(async move {
            players::adjust_money(txn, player_id, delta).await?;
            Ok(())
        })
    })
    .await
}

/// Poll until the game's turn pointer lands on `index` or the timeout
/// elapses. Used to observe the detached AI chain.
pub async fn wait_for_current_index(
    state: &AppState,
    game_id: i64,
    index: i32,
    timeout: Duration,
) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Ok(game) = get_game(state, game_id).await {
            if game.current_player_index == index {
                return true;
            }
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Executor that records every invocation and succeeds without acting.
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    pub calls: Arc<Mutex<Vec<(i64, i64)>>>,
}

#[async_trait]
impl AiExecutor for RecordingExecutor {
    async fn execute_turn(
        &self,
        _state: &AppState,
        game_id: i64,
        player_id: i64,
    ) -> Result<TurnOutcome, AiError> {
        self.calls.lock().push((game_id, player_id));
        Ok(TurnOutcome::Acted)
    }
}

/// Executor that always fails.
#[derive(Clone, Default)]
pub struct FailingExecutor {
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl AiExecutor for FailingExecutor {
    async fn execute_turn(
        &self,
        _state: &AppState,
        _game_id: i64,
        _player_id: i64,
    ) -> Result<TurnOutcome, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AiError::Internal("simulated AI crash".into()))
    }
}

/// Executor that sleeps past any reasonable deadline; `completed` stays
/// false when the coordinator abandons it.
#[derive(Clone, Default)]
pub struct StallingExecutor {
    pub started: Arc<AtomicUsize>,
    pub completed: Arc<AtomicUsize>,
}

#[async_trait]
impl AiExecutor for StallingExecutor {
    async fn execute_turn(
        &self,
        _state: &AppState,
        _game_id: i64,
        _player_id: i64,
    ) -> Result<TurnOutcome, AiError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(30)).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(TurnOutcome::Passed)
    }
}
