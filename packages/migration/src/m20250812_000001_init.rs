use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Games {
    Table,
    Id,
    CreatedBy,
    Name,
    Status,
    CurrentPlayerIndex,
    RngSeed,
    CreatedAt,
    UpdatedAt,
    StartedAt,
}

#[derive(Iden)]
enum GamePlayers {
    Table,
    Id,
    GameId,
    UserId,
    PlayerKind,
    TurnOrder,
    Money,
    TrainKind,
    PosRow,
    PosCol,
    Loads,
    Hand,
    TurnNo,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TurnActions {
    Table,
    Id,
    GameId,
    PlayerId,
    TurnNo,
    Kind,
    Payload,
    CreatedAt,
}

#[derive(Iden)]
enum TrackSegments {
    Table,
    Id,
    GameId,
    PlayerId,
    FromRow,
    FromCol,
    ToRow,
    ToCol,
    CreatedAt,
}

// Statuses and kinds are stored as short strings rather than database enum
// types so the same migration runs on Postgres and the SQLite test profile.

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Games::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(Games::Name).string_len(128).null())
                    .col(ColumnDef::new(Games::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Games::CurrentPlayerIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Games::RngSeed).big_integer().not_null())
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GamePlayers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GamePlayers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GamePlayers::GameId).big_integer().not_null())
                    .col(ColumnDef::new(GamePlayers::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GamePlayers::PlayerKind)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GamePlayers::TurnOrder).integer().not_null())
                    .col(ColumnDef::new(GamePlayers::Money).big_integer().not_null())
                    .col(
                        ColumnDef::new(GamePlayers::TrainKind)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GamePlayers::PosRow).integer().null())
                    .col(ColumnDef::new(GamePlayers::PosCol).integer().null())
                    .col(ColumnDef::new(GamePlayers::Loads).json_binary().not_null())
                    .col(ColumnDef::new(GamePlayers::Hand).json_binary().not_null())
                    .col(
                        ColumnDef::new(GamePlayers::TurnNo)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GamePlayers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GamePlayers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_players_game")
                            .from(GamePlayers::Table, GamePlayers::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_game_players_game_turn_order")
                    .table(GamePlayers::Table)
                    .col(GamePlayers::GameId)
                    .col(GamePlayers::TurnOrder)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_game_players_game_user")
                    .table(GamePlayers::Table)
                    .col(GamePlayers::GameId)
                    .col(GamePlayers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TurnActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TurnActions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TurnActions::GameId).big_integer().not_null())
                    .col(
                        ColumnDef::new(TurnActions::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TurnActions::TurnNo).integer().not_null())
                    .col(ColumnDef::new(TurnActions::Kind).string_len(8).not_null())
                    .col(
                        ColumnDef::new(TurnActions::Payload)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TurnActions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_turn_actions_game")
                            .from(TurnActions::Table, TurnActions::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_turn_actions_player")
                            .from(TurnActions::Table, TurnActions::PlayerId)
                            .to(GamePlayers::Table, GamePlayers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_turn_actions_player_turn")
                    .table(TurnActions::Table)
                    .col(TurnActions::PlayerId)
                    .col(TurnActions::TurnNo)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TrackSegments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrackSegments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TrackSegments::GameId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrackSegments::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TrackSegments::FromRow).integer().not_null())
                    .col(ColumnDef::new(TrackSegments::FromCol).integer().not_null())
                    .col(ColumnDef::new(TrackSegments::ToRow).integer().not_null())
                    .col(ColumnDef::new(TrackSegments::ToCol).integer().not_null())
                    .col(
                        ColumnDef::new(TrackSegments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_track_segments_game")
                            .from(TrackSegments::Table, TrackSegments::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_track_segments_game")
                    .table(TrackSegments::Table)
                    .col(TrackSegments::GameId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TrackSegments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TurnActions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GamePlayers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await?;
        Ok(())
    }
}
