use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Applications {
    Table,
    JobId,
    VendorId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One application per vendor per job; racing applies hit this index.
        manager
            .create_index(
                Index::create()
                    .name("idx_applications_job_vendor_unique")
                    .table(Applications::Table)
                    .col(Applications::JobId)
                    .col(Applications::VendorId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_applications_job_vendor_unique")
                    .table(Applications::Table)
                    .to_owned(),
            )
            .await
    }
}
