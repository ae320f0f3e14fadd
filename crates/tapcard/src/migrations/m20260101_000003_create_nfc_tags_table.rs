use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NfcTags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NfcTags::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NfcTags::TagId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(NfcTags::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(NfcTags::VerifiedBy).string().null())
                    .col(ColumnDef::new(NfcTags::VerifiedAt).timestamp().null())
                    .col(ColumnDef::new(NfcTags::ClaimedBy).integer().null())
                    .col(ColumnDef::new(NfcTags::ClaimedAt).timestamp().null())
                    .col(ColumnDef::new(NfcTags::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(NfcTags::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nfc_tags_claimed_by")
                            .from(NfcTags::Table, NfcTags::ClaimedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_nfc_tags_claimed_by")
                    .table(NfcTags::Table)
                    .col(NfcTags::ClaimedBy)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NfcTags::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum NfcTags {
    Table,
    Id,
    TagId,
    IsVerified,
    VerifiedBy,
    VerifiedAt,
    ClaimedBy,
    ClaimedAt,
    CreatedAt,
    UpdatedAt,
}
