pub mod txn;
pub mod txn_policy;

use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

/// Get the database connection from state, or fail if none is configured.
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state.db.as_ref().ok_or_else(|| {
        AppError::internal(
            ErrorCode::DbUnavailable,
            "no database connection configured",
        )
    })
}
