use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Applications {
    Table,
    JobId,
    VendorId,
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    SocietyId,
    Status,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Spherical distance index for the nearby-jobs query. The
        // cube/earthdistance extensions are not expressible through the
        // schema builder, so this one goes through raw SQL.
        let conn = manager.get_connection();
        conn.execute_unprepared("CREATE EXTENSION IF NOT EXISTS cube")
            .await?;
        conn.execute_unprepared("CREATE EXTENSION IF NOT EXISTS earthdistance")
            .await?;
        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_jobs_geo_earth \
             ON jobs USING gist (ll_to_earth(geo_lat, geo_lon)) \
             WHERE geo_lat IS NOT NULL AND geo_lon IS NOT NULL",
        )
        .await?;

        // Index on jobs.society_id for the society dashboard listing
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_society_id")
                    .table(Jobs::Table)
                    .col(Jobs::SocietyId)
                    .to_owned(),
            )
            .await?;

        // Index on jobs.status for the expiry sweep
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_status")
                    .table(Jobs::Table)
                    .col(Jobs::Status)
                    .to_owned(),
            )
            .await?;

        // Index on applications.job_id for fetching applicants per job
        manager
            .create_index(
                Index::create()
                    .name("idx_applications_job_id")
                    .table(Applications::Table)
                    .col(Applications::JobId)
                    .to_owned(),
            )
            .await?;

        // Index on applications.vendor_id for the nearby-jobs augmentation
        manager
            .create_index(
                Index::create()
                    .name("idx_applications_vendor_id")
                    .table(Applications::Table)
                    .col(Applications::VendorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_jobs_geo_earth")
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_jobs_society_id")
                    .table(Jobs::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_jobs_status")
                    .table(Jobs::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_applications_job_id")
                    .table(Applications::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_applications_vendor_id")
                    .table(Applications::Table)
                    .to_owned(),
            )
            .await
    }
}
