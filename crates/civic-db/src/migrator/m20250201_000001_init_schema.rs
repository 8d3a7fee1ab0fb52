//! Initial schema: users, voters, complaints, alerts

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // 1. Create users table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::GoogleId, 255).not_null().unique_key())
                    .col(string_len(User::Email, 255).not_null().unique_key())
                    .col(string_len_null(User::Name, 255))
                    .col(string_len_null(User::Mobile, 32))
                    .col(text_null(User::Address))
                    .col(integer_null(User::WardNumber))
                    .col(text_null(User::Photo))
                    .col(text_null(User::AadharPhoto))
                    .col(string_len_null(User::EpicNumber, 32))
                    .col(string_len_null(User::Language, 16))
                    .col(string_len_null(User::District, 255))
                    .col(string_len_null(User::Municipality, 255))
                    .col(string_len(User::Role, 32).not_null().default("citizen"))
                    .col(boolean(User::IsVerified).not_null().default(false))
                    .col(boolean(User::IsProfileComplete).not_null().default(false))
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(User::Table)
                    .col(User::Role)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 2. Create voters table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Voter::Table)
                    .if_not_exists()
                    .col(uuid(Voter::Id).primary_key())
                    .col(string_len(Voter::EpicNumber, 32).not_null().unique_key())
                    .col(string_len_null(Voter::Name, 255))
                    .col(string_len_null(Voter::FatherName, 255))
                    .col(string_len_null(Voter::Email, 255))
                    .col(string_len_null(Voter::Mobile, 32))
                    .col(text_null(Voter::Address))
                    .col(integer_null(Voter::WardNumber))
                    .col(string_len_null(Voter::District, 255))
                    .col(string_len_null(Voter::Municipality, 255))
                    .col(text_null(Voter::Photo))
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 3. Create complaints table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Complaint::Table)
                    .if_not_exists()
                    .col(uuid(Complaint::Id).primary_key())
                    .col(uuid(Complaint::UserId).not_null())
                    .col(string_len(Complaint::Category, 32).not_null())
                    .col(text(Complaint::Description).not_null())
                    .col(text(Complaint::ImageUrls).not_null())
                    .col(text_null(Complaint::VoiceNoteUrl))
                    .col(text(Complaint::Address).not_null())
                    .col(double(Complaint::Latitude).not_null())
                    .col(double(Complaint::Longitude).not_null())
                    .col(integer(Complaint::WardNumber).not_null())
                    .col(
                        string_len(Complaint::Status, 32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        timestamp_with_time_zone(Complaint::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Complaint::ResolvedAt))
                    .col(text_null(Complaint::SolutionImageUrl))
                    .col(text_null(Complaint::ResolutionNote))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaints_user_id")
                            .from(Complaint::Table, Complaint::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_complaints_user_id")
                    .table(Complaint::Table)
                    .col(Complaint::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_complaints_created_at")
                    .table(Complaint::Table)
                    .col(Complaint::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 4. Create alerts table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Alert::Table)
                    .if_not_exists()
                    .col(uuid(Alert::Id).primary_key())
                    .col(string_len(Alert::Title, 255).not_null())
                    .col(text(Alert::Message).not_null())
                    .col(string_len(Alert::Ward, 16).not_null().default("all"))
                    .col(string_len(Alert::Date, 32).not_null())
                    .col(string_len(Alert::Time, 32).not_null())
                    .col(
                        timestamp_with_time_zone(Alert::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_alerts_ward")
                    .table(Alert::Table)
                    .col(Alert::Ward)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alert::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Complaint::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Voter::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    GoogleId,
    Email,
    Name,
    Mobile,
    Address,
    WardNumber,
    Photo,
    AadharPhoto,
    EpicNumber,
    Language,
    District,
    Municipality,
    Role,
    IsVerified,
    IsProfileComplete,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Voter {
    #[sea_orm(iden = "voters")]
    Table,
    Id,
    EpicNumber,
    Name,
    FatherName,
    Email,
    Mobile,
    Address,
    WardNumber,
    District,
    Municipality,
    Photo,
}

#[derive(DeriveIden)]
enum Complaint {
    #[sea_orm(iden = "complaints")]
    Table,
    Id,
    UserId,
    Category,
    Description,
    ImageUrls,
    VoiceNoteUrl,
    Address,
    Latitude,
    Longitude,
    WardNumber,
    Status,
    CreatedAt,
    ResolvedAt,
    SolutionImageUrl,
    ResolutionNote,
}

#[derive(DeriveIden)]
enum Alert {
    #[sea_orm(iden = "alerts")]
    Table,
    Id,
    Title,
    Message,
    Ward,
    Date,
    Time,
    CreatedAt,
}
