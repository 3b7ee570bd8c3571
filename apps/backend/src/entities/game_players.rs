use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum PlayerKind {
    #[sea_orm(string_value = "HUMAN")]
    Human,
    #[sea_orm(string_value = "AI")]
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TrainKind {
    #[sea_orm(string_value = "FREIGHT")]
    Freight,
    #[sea_orm(string_value = "FAST_FREIGHT")]
    FastFreight,
    #[sea_orm(string_value = "HEAVY_FREIGHT")]
    HeavyFreight,
    #[sea_orm(string_value = "SUPER_FREIGHT")]
    SuperFreight,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "game_id")]
    pub game_id: i64,
    #[sea_orm(column_name = "user_id")]
    pub user_id: i64,
    #[sea_orm(column_name = "player_kind")]
    pub player_kind: PlayerKind,
    #[sea_orm(column_name = "turn_order")]
    pub turn_order: i32,
    pub money: i64,
    #[sea_orm(column_name = "train_kind")]
    pub train_kind: TrainKind,
    #[sea_orm(column_name = "pos_row")]
    pub pos_row: Option<i32>,
    #[sea_orm(column_name = "pos_col")]
    pub pos_col: Option<i32>,
    #[sea_orm(column_type = "JsonBinary")]
    pub loads: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub hand: Json,
    #[sea_orm(column_name = "turn_no")]
    pub turn_no: i32,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::GameId",
        to = "super::games::Column::Id"
    )]
    Game,
    #[sea_orm(has_many = "super::turn_actions::Entity")]
    TurnActions,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl Related<super::turn_actions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TurnActions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
