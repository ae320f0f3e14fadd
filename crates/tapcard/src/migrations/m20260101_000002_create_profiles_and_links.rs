use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ── profiles: one per user, slug is the public handle ──
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Profiles::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Profiles::DisplayName).string().not_null())
                    .col(ColumnDef::new(Profiles::Bio).text().null())
                    .col(ColumnDef::new(Profiles::Phone).string().null())
                    .col(
                        ColumnDef::new(Profiles::Slug)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Profiles::AvatarUrl).string().null())
                    .col(
                        ColumnDef::new(Profiles::ThemeColor)
                            .string()
                            .not_null()
                            .default("#000000"),
                    )
                    .col(
                        ColumnDef::new(Profiles::BackgroundColor)
                            .string()
                            .not_null()
                            .default("#ffffff"),
                    )
                    .col(ColumnDef::new(Profiles::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Profiles::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_user_id")
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ── links ──
        manager
            .create_table(
                Table::create()
                    .table(Links::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Links::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Links::ProfileId).integer().not_null())
                    .col(ColumnDef::new(Links::Title).string().not_null())
                    .col(ColumnDef::new(Links::Url).text().not_null())
                    .col(ColumnDef::new(Links::Icon).string().not_null())
                    .col(
                        ColumnDef::new(Links::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Links::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Links::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_links_profile_id")
                            .from(Links::Table, Links::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_links_profile_order")
                    .table(Links::Table)
                    .col(Links::ProfileId)
                    .col(Links::SortOrder)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Links::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    UserId,
    DisplayName,
    Bio,
    Phone,
    Slug,
    AvatarUrl,
    ThemeColor,
    BackgroundColor,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Links {
    Table,
    Id,
    ProfileId,
    Title,
    Url,
    Icon,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}
