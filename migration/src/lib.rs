pub use sea_orm_migration::prelude::*;

mod m20260801_000001_create_societies_table;
mod m20260801_000002_create_vendors_table;
mod m20260801_000003_create_services_table;
mod m20260801_000004_create_jobs_table;
mod m20260801_000005_create_applications_table;
mod m20260801_000006_create_subscriptions_table;
mod m20260810_000001_add_unique_job_vendor_to_applications;
mod m20260810_000002_add_geo_index_to_jobs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_societies_table::Migration),
            Box::new(m20260801_000002_create_vendors_table::Migration),
            Box::new(m20260801_000003_create_services_table::Migration),
            Box::new(m20260801_000004_create_jobs_table::Migration),
            Box::new(m20260801_000005_create_applications_table::Migration),
            Box::new(m20260801_000006_create_subscriptions_table::Migration),
            Box::new(m20260810_000001_add_unique_job_vendor_to_applications::Migration),
            Box::new(m20260810_000002_add_geo_index_to_jobs::Migration),
        ]
    }
}
