//! DTOs for actions_sea adapter.

use crate::entities::turn_actions::ActionKind;

/// DTO for appending a ledger entry.
#[derive(Debug, Clone)]
pub struct ActionInsert {
    pub game_id: i64,
    pub player_id: i64,
    pub turn_no: i32,
    pub kind: ActionKind,
    pub payload: serde_json::Value,
}
