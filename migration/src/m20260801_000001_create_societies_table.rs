use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `societies` table and its columns.
#[derive(DeriveIden)]
enum Societies {
    Table,
    Id,
    Name,
    Email,
    Contact,
    Address,
    City,
    ResidentsCount,
    IsApproved,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Societies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Societies::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Societies::Name).string().not_null())
                    .col(
                        ColumnDef::new(Societies::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Societies::Contact).string().not_null())
                    .col(ColumnDef::new(Societies::Address).string().not_null())
                    .col(ColumnDef::new(Societies::City).string().not_null())
                    .col(
                        ColumnDef::new(Societies::ResidentsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Societies::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Societies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Societies::Table).to_owned())
            .await
    }
}
