// Integration tests for the detached AI turn chain.

mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use backend::services::turn_flow::TurnFlowService;
use backend::AppError;

use support::{
    build_test_state_with_executor, setup_game, wait_for_current_index, FailingExecutor,
    PlayerSpec, RecordingExecutor, StallingExecutor,
};

const CHAIN_WAIT: Duration = Duration::from_secs(3);

#[tokio::test]
async fn chain_plays_the_ai_and_reaches_the_next_human() -> Result<(), AppError> {
    let executor = RecordingExecutor::default();
    let state =
        build_test_state_with_executor(Arc::new(executor.clone()), None).await?;
    let game = setup_game(
        &state,
        &[
            PlayerSpec::human(101),
            PlayerSpec::ai(201),
            PlayerSpec::human(102),
        ],
    )
    .await?;

    // The human's end_turn returns immediately, reporting the AI as next.
    let advance = TurnFlowService.end_turn(&state, game.game_id).await?;
    assert_eq!(advance.current_player_index, 1);
    assert!(advance.next_player_is_ai);
    assert_eq!(advance.next_player_id, game.player(1).id);

    // The chain then runs in the background until the human at seat 2.
    assert!(wait_for_current_index(&state, game.game_id, 2, CHAIN_WAIT).await);
    let calls = executor.calls.lock().clone();
    assert_eq!(calls, vec![(game.game_id, game.player(1).id)]);
    Ok(())
}

#[tokio::test]
async fn chain_walks_through_consecutive_ai_players() -> Result<(), AppError> {
    let executor = RecordingExecutor::default();
    let state =
        build_test_state_with_executor(Arc::new(executor.clone()), None).await?;
    let game = setup_game(
        &state,
        &[
            PlayerSpec::human(101),
            PlayerSpec::ai(201),
            PlayerSpec::ai(202),
            PlayerSpec::human(102),
        ],
    )
    .await?;

    TurnFlowService.end_turn(&state, game.game_id).await?;

    assert!(wait_for_current_index(&state, game.game_id, 3, CHAIN_WAIT).await);
    let calls = executor.calls.lock().clone();
    assert_eq!(
        calls,
        vec![
            (game.game_id, game.player(1).id),
            (game.game_id, game.player(2).id),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn a_crashing_ai_forfeits_and_the_chain_continues() -> Result<(), AppError> {
    let executor = FailingExecutor::default();
    let state =
        build_test_state_with_executor(Arc::new(executor.clone()), None).await?;
    let game = setup_game(
        &state,
        &[
            PlayerSpec::human(101),
            PlayerSpec::ai(201),
            PlayerSpec::human(102),
        ],
    )
    .await?;

    // The caller sees a clean advance; the executor error is swallowed.
    let advance = TurnFlowService.end_turn(&state, game.game_id).await?;
    assert!(advance.next_player_is_ai);

    assert!(wait_for_current_index(&state, game.game_id, 2, CHAIN_WAIT).await);
    assert_eq!(executor.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn a_stalled_ai_is_abandoned_at_the_deadline() -> Result<(), AppError> {
    let executor = StallingExecutor::default();
    let state = build_test_state_with_executor(
        Arc::new(executor.clone()),
        Some(Duration::from_millis(50)),
    )
    .await?;
    let game = setup_game(
        &state,
        &[
            PlayerSpec::human(101),
            PlayerSpec::ai(201),
            PlayerSpec::human(102),
        ],
    )
    .await?;

    TurnFlowService.end_turn(&state, game.game_id).await?;

    assert!(wait_for_current_index(&state, game.game_id, 2, CHAIN_WAIT).await);
    assert_eq!(executor.started.load(Ordering::SeqCst), 1);
    // Cancelled-by-ignoring: the abandoned future never completes.
    assert_eq!(executor.completed.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn an_all_ai_table_stops_after_a_full_cycle() -> Result<(), AppError> {
    let executor = RecordingExecutor::default();
    let state =
        build_test_state_with_executor(Arc::new(executor.clone()), None).await?;
    let game = setup_game(&state, &[PlayerSpec::ai(201), PlayerSpec::ai(202)]).await?;

    TurnFlowService.end_turn(&state, game.game_id).await?;

    // Both seats get one turn, then the chain gives up instead of spinning.
    let deadline = tokio::time::Instant::now() + CHAIN_WAIT;
    while executor.calls.lock().len() < 2 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    tokio::time::sleep(Duration::from_millis(200)).await;

    let calls = executor.calls.lock().clone();
    assert_eq!(
        calls,
        vec![
            (game.game_id, game.player(1).id),
            (game.game_id, game.player(0).id),
        ]
    );
    Ok(())
}
