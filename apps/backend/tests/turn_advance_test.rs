// Integration tests for turn-pointer advancement.

mod support;

use backend::services::turn_flow::TurnFlowService;
use backend::{AppError, ErrorCode};

use support::{build_test_state, setup_game, PlayerSpec};

#[tokio::test]
async fn end_turn_walks_the_table_in_order_and_wraps() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game = setup_game(
        &state,
        &[
            PlayerSpec::human(101),
            PlayerSpec::human(102),
            PlayerSpec::human(103),
        ],
    )
    .await?;

    let service = TurnFlowService;
    let count = game.players.len() as i32;
    let mut expected = 0;
    for _ in 0..7 {
        let previous = expected;
        let advance = service.end_turn(&state, game.game_id).await?;
        expected = (previous + 1) % count;
        assert_eq!(advance.current_player_index, expected);
        assert!(advance.current_player_index >= 0 && advance.current_player_index < count);
        assert_eq!(
            advance.next_player_id,
            game.players[expected as usize].id
        );
        assert!(!advance.next_player_is_ai);

        let loaded = support::get_game(&state, game.game_id).await?;
        assert_eq!(loaded.current_player_index, expected);
    }
    Ok(())
}

#[tokio::test]
async fn end_turn_bumps_the_outgoing_players_counter() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game = setup_game(&state, &[PlayerSpec::human(101), PlayerSpec::human(102)]).await?;

    let service = TurnFlowService;
    service.end_turn(&state, game.game_id).await?;

    let outgoing = support::get_player(&state, game.player(0).id).await?;
    let incoming = support::get_player(&state, game.player(1).id).await?;
    assert_eq!(outgoing.turn_no, 1);
    assert_eq!(incoming.turn_no, 0);
    Ok(())
}

#[tokio::test]
async fn end_turn_fails_for_missing_game() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let err = TurnFlowService
        .end_turn(&state, 424242)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotFound);
    Ok(())
}

#[tokio::test]
async fn end_turn_fails_for_game_without_players() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game = backend::services::games::GameService
        .create_game(
            &state,
            backend::adapters::games_sea::GameCreate::new(support::TEST_SEED),
        )
        .await?;

    let err = TurnFlowService.end_turn(&state, game.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoPlayersFound);
    Ok(())
}
