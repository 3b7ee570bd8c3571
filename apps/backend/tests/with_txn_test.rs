// Integration tests for the transaction envelope.

mod support;

use std::sync::Arc;

use parking_lot::Mutex;
use sea_orm::TransactionTrait;

use backend::adapters::games_sea::GameCreate;
use backend::db::require_db;
use backend::db::txn::{with_txn, SharedTxn};
use backend::errors::ErrorCode;
use backend::repos::games;
use backend::AppError;

use support::build_test_state;

#[tokio::test]
async fn with_txn_commits_on_ok() -> Result<(), AppError> {
    let state = build_test_state().await?;

    let game_id = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let game = games::create_game(txn, GameCreate::new(1)).await?;
            Ok(game.id)
        })
    })
    .await?;

    let conn = require_db(&state)?;
    assert!(games::find_by_id(conn, game_id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn with_txn_rolls_back_on_err() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let created_id = Arc::new(Mutex::new(None));

    let captured = created_id.clone();
    let result: Result<(), AppError> = with_txn(None, &state, move |txn| {
        Box::pin(async move {
            let game = games::create_game(txn, GameCreate::new(1)).await?;
            *captured.lock() = Some(game.id);
            Err(AppError::validation(
                ErrorCode::ValidationError,
                "simulated failure",
            ))
        })
    })
    .await;
    assert!(result.is_err());

    let game_id = created_id.lock().expect("insert ran before the failure");
    let conn = require_db(&state)?;
    assert!(games::find_by_id(conn, game_id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn with_txn_leaves_a_shared_txn_uncommitted() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let conn = require_db(&state)?;

    let shared = SharedTxn(Arc::new(conn.begin().await?));
    let game_id = with_txn(Some(&shared), &state, |txn| {
        Box::pin(async move {
            let game = games::create_game(txn, GameCreate::new(1)).await?;
            Ok(game.id)
        })
    })
    .await?;

    // The envelope did not commit the injected transaction; rolling it
    // back discards the insert.
    Arc::try_unwrap(shared.0)
        .expect("sole owner of the shared txn")
        .rollback()
        .await?;

    assert!(games::find_by_id(conn, game_id).await?.is_none());
    Ok(())
}
