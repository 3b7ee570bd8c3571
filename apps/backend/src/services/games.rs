//! Game lifecycle: create, join, start, and deck priming on boot.
//!
//! Victory/end resolution is handled elsewhere; this service only brings a
//! game to the point where the turn engine can run it.

use time::OffsetDateTime;
use tracing::info;

use crate::adapters::games_sea::GameCreate;
use crate::adapters::players_sea::PlayerCreate;
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::domain::cards;
use crate::domain::rules;
use crate::entities::game_players::{PlayerKind, TrainKind};
use crate::entities::games::GameStatus;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::repos::games::Game;
use crate::repos::players::Player;
use crate::repos::{games, players};
use crate::services::decks::DeckJournal;
use crate::state::app_state::AppState;

/// Game lifecycle service.
#[derive(Default)]
pub struct GameService;

impl GameService {
    pub async fn create_game(&self, state: &AppState, dto: GameCreate) -> Result<Game, AppError> {
        with_txn(None, state, move |txn| {
            Box::pin(async move {
                let game = games::create_game(txn, dto).await?;
                info!(game_id = game.id, "game created");
                Ok(game)
            })
        })
        .await
    }

    /// Add a player to a lobby. Turn order is assignment order.
    pub async fn join_game(
        &self,
        state: &AppState,
        game_id: i64,
        user_id: i64,
        kind: PlayerKind,
        train: TrainKind,
    ) -> Result<Player, AppError> {
        with_txn(None, state, move |txn| {
            Box::pin(async move {
                let game = games::require_game_for_update(txn, game_id).await?;
                if game.status != GameStatus::Lobby {
                    return Err(DomainError::validation(
                        ValidationKind::GameNotActive,
                        format!("game {game_id} is no longer accepting players"),
                    )
                    .into());
                }

                if players::find_by_game_and_user(txn, game_id, user_id)
                    .await?
                    .is_some()
                {
                    return Err(DomainError::conflict(
                        ConflictKind::Other("ALREADY_JOINED".into()),
                        format!("user {user_id} already has a player in game {game_id}"),
                    )
                    .into());
                }

                let seat = players::find_all_by_game(txn, game_id).await?.len() as i32;
                let player = players::create_player(
                    txn,
                    PlayerCreate::new(
                        game_id,
                        user_id,
                        kind,
                        seat,
                        rules::STARTING_MONEY,
                        train,
                    ),
                )
                .await?;

                info!(game_id, player_id = player.id, turn_order = seat, "player joined");
                Ok(player)
            })
        })
        .await
    }

    /// Start a lobby game: shuffle the deck from the game's seed and deal
    /// opening hands in turn order.
    pub async fn start_game(&self, state: &AppState, game_id: i64) -> Result<Game, AppError> {
        let journal = DeckJournal::new(&state.decks, game_id);
        let op_journal = journal.clone();
        let decks = state.decks.clone();

        let result = with_txn(None, state, move |txn| {
            Box::pin(async move {
                let game = games::require_game_for_update(txn, game_id).await?;
                if game.status != GameStatus::Lobby {
                    return Err(DomainError::validation(
                        ValidationKind::GameNotActive,
                        format!("game {game_id} has already started"),
                    )
                    .into());
                }

                let all_players = players::find_all_by_game(txn, game_id).await?;
                if all_players.len() < rules::MIN_PLAYERS_TO_START {
                    return Err(DomainError::validation(
                        ValidationKind::NotEnoughPlayers,
                        format!(
                            "{} players joined, need at least {}",
                            all_players.len(),
                            rules::MIN_PLAYERS_TO_START
                        ),
                    )
                    .into());
                }

                decks.init_game(game_id, cards::standard_deck(), game.rng_seed);
                for player in &all_players {
                    let mut hand = Vec::with_capacity(rules::HAND_SIZE);
                    for _ in 0..rules::HAND_SIZE {
                        let card = op_journal.draw_card().ok_or_else(|| {
                            DomainError::conflict(
                                ConflictKind::DeckExhausted,
                                "deck too small for opening hands",
                            )
                        })?;
                        hand.push(card);
                    }
                    players::set_hand(txn, player.id, &hand).await?;
                }

                let game = games::set_status(
                    txn,
                    game_id,
                    GameStatus::Active,
                    Some(OffsetDateTime::now_utc()),
                )
                .await?;

                info!(game_id, players = all_players.len(), "game started");
                Ok(game)
            })
        })
        .await;

        if result.is_err() {
            journal.unwind();
        }
        result
    }

    /// Rebuild a game's deck from persisted hands, e.g. after a restart.
    /// Cards found in hands are marked dealt; everything else returns to
    /// the seeded draw order.
    pub async fn prime_deck(&self, state: &AppState, game_id: i64) -> Result<(), AppError> {
        let conn = require_db(state)?;
        let game = games::require_game(conn, game_id).await?;
        let all_players = players::find_all_by_game(conn, game_id).await?;

        state
            .decks
            .init_game(game_id, cards::standard_deck(), game.rng_seed);
        let mut dealt = 0usize;
        for player in &all_players {
            for card in &player.hand {
                state.decks.ensure_dealt(game_id, *card);
                dealt += 1;
            }
        }

        info!(game_id, dealt, "deck primed from persisted hands");
        Ok(())
    }
}
