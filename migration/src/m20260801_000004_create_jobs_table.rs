use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `jobs` table and its columns.
///
/// Location is stored dually: `Latitude`/`Longitude` are the legacy display
/// pair present on every row, while `GeoLat`/`GeoLon` feed the earthdistance
/// index and may be NULL on rows imported from before the index existed.
#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
    SocietyId,
    Title,
    JobType,
    RequiredExperience,
    Details,
    ContactNumber,
    Latitude,
    Longitude,
    GeoLat,
    GeoLon,
    OfferedPrice,
    ScheduledFor,
    QuotationRequired,
    IsActive,
    Status,
    SelectedVendorId,
    CompletedAt,
    CreatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Societies {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Vendors {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Jobs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Jobs::SocietyId).uuid().not_null())
                    .col(ColumnDef::new(Jobs::Title).string().not_null())
                    .col(ColumnDef::new(Jobs::JobType).string().not_null())
                    .col(ColumnDef::new(Jobs::RequiredExperience).string().not_null())
                    .col(ColumnDef::new(Jobs::Details).text().not_null())
                    .col(ColumnDef::new(Jobs::ContactNumber).string().not_null())
                    .col(ColumnDef::new(Jobs::Latitude).double().not_null())
                    .col(ColumnDef::new(Jobs::Longitude).double().not_null())
                    .col(ColumnDef::new(Jobs::GeoLat).double().null())
                    .col(ColumnDef::new(Jobs::GeoLon).double().null())
                    .col(ColumnDef::new(Jobs::OfferedPrice).big_integer().not_null())
                    .col(
                        ColumnDef::new(Jobs::ScheduledFor)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Jobs::QuotationRequired)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Jobs::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Jobs::Status)
                            .string()
                            .not_null()
                            .default("new"),
                    )
                    .col(ColumnDef::new(Jobs::SelectedVendorId).uuid().null())
                    .col(
                        ColumnDef::new(Jobs::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Jobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jobs_society_id")
                            .from(Jobs::Table, Jobs::SocietyId)
                            .to(Societies::Table, Societies::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jobs_selected_vendor_id")
                            .from(Jobs::Table, Jobs::SelectedVendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await
    }
}
