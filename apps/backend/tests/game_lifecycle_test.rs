// Integration tests for game lifecycle: create, join, start, deck priming.

mod support;

use backend::domain::cards::DECK_SIZE;
use backend::domain::rules::{HAND_SIZE, STARTING_MONEY};
use backend::entities::game_players::{PlayerKind, TrainKind};
use backend::entities::games::GameStatus;
use backend::services::games::GameService;
use backend::{AppError, ErrorCode};

use support::{build_test_state, setup_two_humans};

#[tokio::test]
async fn start_deals_opening_hands_from_seeded_deck() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game = setup_two_humans(&state).await?;

    let dealt_cards = game.players.len() * HAND_SIZE;
    assert_eq!(
        state.decks.draw_pile_len(game.game_id),
        DECK_SIZE - dealt_cards
    );

    for player in &game.players {
        assert_eq!(player.hand.len(), HAND_SIZE);
        assert_eq!(player.money, STARTING_MONEY);
        assert_eq!(player.capacity(), 2);
        assert!(player.position.is_none());
        assert!(player.loads.is_empty());
        for card in &player.hand {
            assert!(state.decks.is_dealt(game.game_id, *card));
        }
    }

    let loaded = support::get_game(&state, game.game_id).await?;
    assert_eq!(loaded.status, GameStatus::Active);
    assert_eq!(loaded.current_player_index, 0);
    Ok(())
}

#[tokio::test]
async fn join_is_rejected_once_the_game_started() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game = setup_two_humans(&state).await?;

    let service = GameService;
    let err = service
        .join_game(
            &state,
            game.game_id,
            999,
            PlayerKind::Human,
            TrainKind::Freight,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotActive);
    Ok(())
}

#[tokio::test]
async fn duplicate_join_conflicts() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let service = GameService;
    let game = service
        .create_game(
            &state,
            backend::adapters::games_sea::GameCreate::new(support::TEST_SEED),
        )
        .await?;
    service
        .join_game(&state, game.id, 101, PlayerKind::Human, TrainKind::Freight)
        .await?;
    let err = service
        .join_game(&state, game.id, 101, PlayerKind::Human, TrainKind::Freight)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conflict);
    Ok(())
}

#[tokio::test]
async fn start_requires_minimum_players() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let service = GameService;
    let game = service
        .create_game(
            &state,
            backend::adapters::games_sea::GameCreate::new(support::TEST_SEED),
        )
        .await?;
    service
        .join_game(&state, game.id, 101, PlayerKind::Human, TrainKind::Freight)
        .await?;

    let err = service.start_game(&state, game.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotEnoughPlayers);

    let loaded = support::get_game(&state, game.id).await?;
    assert_eq!(loaded.status, GameStatus::Lobby);
    Ok(())
}

#[tokio::test]
async fn prime_deck_rebuilds_dealt_set_from_hands() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game = setup_two_humans(&state).await?;

    // Simulate a restart: wipe runtime deck state, then prime from the DB.
    state.decks.init_game(game.game_id, vec![], 0);
    GameService.prime_deck(&state, game.game_id).await?;

    let dealt_cards = game.players.len() * HAND_SIZE;
    assert_eq!(
        state.decks.draw_pile_len(game.game_id),
        DECK_SIZE - dealt_cards
    );
    for player in &game.players {
        for card in &player.hand {
            assert!(state.decks.is_dealt(game.game_id, *card));
        }
    }
    Ok(())
}
