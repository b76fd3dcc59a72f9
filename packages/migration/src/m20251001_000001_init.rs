use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    UserId,
    Name,
    Email,
    Phone,
    Password,
    Role,
    MiningSite,
    Location,
    SupervisorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum VideoModules {
    Table,
    Id,
    Title,
    Description,
    VideoUrl,
    Duration,
    Category,
    Thumbnail,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Questions {
    Table,
    Id,
    VideoId,
    Question,
    Options,
    Answer,
}

#[derive(Iden)]
enum ModuleCompletions {
    Table,
    Id,
    MinerId,
    VideoId,
    Score,
    TotalQuestions,
    CompletedAt,
    CompletedOn,
}

#[derive(Iden)]
enum StarVideos {
    Table,
    Id,
    VideoId,
    SupervisorId,
    SetDate,
    IsActive,
}

#[derive(Iden)]
enum Emergencies {
    Table,
    Id,
    UserId,
    EmergencyId,
    Severity,
    Latitude,
    Longitude,
    Issue,
    MediaStatus,
    MediaUrl,
    Location,
    IncidentTime,
    ReportingTime,
    Status,
    ResolutionTime,
}

#[derive(Iden)]
enum ChecklistItems {
    Table,
    Id,
    SupervisorId,
    Kind,
    Title,
    Description,
    IsDefault,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ChecklistCompletions {
    Table,
    Id,
    UserId,
    ItemId,
    IsCompleted,
    CompletedAt,
    Date,
}

fn pk(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .auto_increment()
        .to_owned()
}

fn timestamp(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(ColumnDef::new(Users::UserId).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Phone).string().not_null().default(""))
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::MiningSite).string().not_null().default(""))
                    .col(ColumnDef::new(Users::Location).string().not_null().default(""))
                    .col(ColumnDef::new(Users::SupervisorId).string().null())
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_supervisor_id")
                            .from(Users::Table, Users::SupervisorId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_users_supervisor_id")
                    .table(Users::Table)
                    .col(Users::SupervisorId)
                    .to_owned(),
            )
            .await?;

        // video_modules
        manager
            .create_table(
                Table::create()
                    .table(VideoModules::Table)
                    .if_not_exists()
                    .col(pk(VideoModules::Id))
                    .col(ColumnDef::new(VideoModules::Title).string().not_null())
                    .col(ColumnDef::new(VideoModules::Description).text().not_null().default(""))
                    .col(ColumnDef::new(VideoModules::VideoUrl).string().not_null())
                    .col(ColumnDef::new(VideoModules::Duration).integer().not_null().default(0))
                    .col(ColumnDef::new(VideoModules::Category).string().not_null().default(""))
                    .col(ColumnDef::new(VideoModules::Thumbnail).string().not_null().default(""))
                    .col(
                        ColumnDef::new(VideoModules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(VideoModules::CreatedBy).string().null())
                    .col(timestamp(VideoModules::CreatedAt))
                    .col(timestamp(VideoModules::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // questions
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(pk(Questions::Id))
                    .col(ColumnDef::new(Questions::VideoId).big_integer().not_null())
                    .col(ColumnDef::new(Questions::Question).text().not_null())
                    // JSON-encoded array of option strings
                    .col(ColumnDef::new(Questions::Options).text().not_null())
                    .col(ColumnDef::new(Questions::Answer).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_questions_video_id")
                            .from(Questions::Table, Questions::VideoId)
                            .to(VideoModules::Table, VideoModules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_questions_video_id")
                    .table(Questions::Table)
                    .col(Questions::VideoId)
                    .to_owned(),
            )
            .await?;

        // module_completions
        manager
            .create_table(
                Table::create()
                    .table(ModuleCompletions::Table)
                    .if_not_exists()
                    .col(pk(ModuleCompletions::Id))
                    .col(ColumnDef::new(ModuleCompletions::MinerId).string().not_null())
                    .col(ColumnDef::new(ModuleCompletions::VideoId).big_integer().not_null())
                    .col(ColumnDef::new(ModuleCompletions::Score).integer().not_null())
                    .col(
                        ColumnDef::new(ModuleCompletions::TotalQuestions)
                            .integer()
                            .not_null(),
                    )
                    .col(timestamp(ModuleCompletions::CompletedAt))
                    .col(ColumnDef::new(ModuleCompletions::CompletedOn).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_module_completions_miner_id")
                            .from(ModuleCompletions::Table, ModuleCompletions::MinerId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_module_completions_video_id")
                            .from(ModuleCompletions::Table, ModuleCompletions::VideoId)
                            .to(VideoModules::Table, VideoModules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_module_completions_miner_completed")
                    .table(ModuleCompletions::Table)
                    .col(ModuleCompletions::MinerId)
                    .col(ModuleCompletions::CompletedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_module_completions_miner_video_day")
                    .table(ModuleCompletions::Table)
                    .col(ModuleCompletions::MinerId)
                    .col(ModuleCompletions::VideoId)
                    .col(ModuleCompletions::CompletedOn)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // star_videos: one row per supervisor per day
        manager
            .create_table(
                Table::create()
                    .table(StarVideos::Table)
                    .if_not_exists()
                    .col(pk(StarVideos::Id))
                    .col(ColumnDef::new(StarVideos::VideoId).big_integer().not_null())
                    .col(ColumnDef::new(StarVideos::SupervisorId).string().not_null())
                    .col(ColumnDef::new(StarVideos::SetDate).date().not_null())
                    .col(
                        ColumnDef::new(StarVideos::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_star_videos_video_id")
                            .from(StarVideos::Table, StarVideos::VideoId)
                            .to(VideoModules::Table, VideoModules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_star_videos_supervisor_date")
                    .table(StarVideos::Table)
                    .col(StarVideos::SupervisorId)
                    .col(StarVideos::SetDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // emergencies
        manager
            .create_table(
                Table::create()
                    .table(Emergencies::Table)
                    .if_not_exists()
                    .col(pk(Emergencies::Id))
                    .col(ColumnDef::new(Emergencies::UserId).string().not_null())
                    .col(ColumnDef::new(Emergencies::EmergencyId).big_integer().not_null())
                    .col(ColumnDef::new(Emergencies::Severity).string().not_null().default(""))
                    .col(ColumnDef::new(Emergencies::Latitude).double().not_null())
                    .col(ColumnDef::new(Emergencies::Longitude).double().not_null())
                    .col(ColumnDef::new(Emergencies::Issue).text().not_null().default(""))
                    .col(ColumnDef::new(Emergencies::MediaStatus).string().not_null())
                    .col(ColumnDef::new(Emergencies::MediaUrl).string().null())
                    .col(ColumnDef::new(Emergencies::Location).string().null())
                    .col(
                        ColumnDef::new(Emergencies::IncidentTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp(Emergencies::ReportingTime))
                    .col(ColumnDef::new(Emergencies::Status).string().not_null())
                    .col(
                        ColumnDef::new(Emergencies::ResolutionTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_emergencies_user_emergency")
                    .table(Emergencies::Table)
                    .col(Emergencies::UserId)
                    .col(Emergencies::EmergencyId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_emergencies_reporting_time")
                    .table(Emergencies::Table)
                    .col(Emergencies::ReportingTime)
                    .to_owned(),
            )
            .await?;

        // checklist_items (pre-start and PPE share one table, split by kind)
        manager
            .create_table(
                Table::create()
                    .table(ChecklistItems::Table)
                    .if_not_exists()
                    .col(pk(ChecklistItems::Id))
                    .col(ColumnDef::new(ChecklistItems::SupervisorId).string().null())
                    .col(ColumnDef::new(ChecklistItems::Kind).string().not_null())
                    .col(ColumnDef::new(ChecklistItems::Title).string().not_null())
                    .col(ColumnDef::new(ChecklistItems::Description).text().not_null().default(""))
                    .col(
                        ColumnDef::new(ChecklistItems::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ChecklistItems::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp(ChecklistItems::CreatedAt))
                    .col(timestamp(ChecklistItems::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_checklist_items_kind_supervisor")
                    .table(ChecklistItems::Table)
                    .col(ChecklistItems::Kind)
                    .col(ChecklistItems::SupervisorId)
                    .to_owned(),
            )
            .await?;

        // checklist_completions
        manager
            .create_table(
                Table::create()
                    .table(ChecklistCompletions::Table)
                    .if_not_exists()
                    .col(pk(ChecklistCompletions::Id))
                    .col(ColumnDef::new(ChecklistCompletions::UserId).string().not_null())
                    .col(ColumnDef::new(ChecklistCompletions::ItemId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ChecklistCompletions::IsCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(timestamp(ChecklistCompletions::CompletedAt))
                    .col(ColumnDef::new(ChecklistCompletions::Date).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checklist_completions_item_id")
                            .from(ChecklistCompletions::Table, ChecklistCompletions::ItemId)
                            .to(ChecklistItems::Table, ChecklistItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_checklist_completions_user_item_date")
                    .table(ChecklistCompletions::Table)
                    .col(ChecklistCompletions::UserId)
                    .col(ChecklistCompletions::ItemId)
                    .col(ChecklistCompletions::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // reverse creation order; indexes go with their tables
        manager
            .drop_table(Table::drop().table(ChecklistCompletions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChecklistItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Emergencies::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StarVideos::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ModuleCompletions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VideoModules::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
