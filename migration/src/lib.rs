pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_users_table;
mod m20240601_000002_create_orders_table;
mod m20240601_000003_create_contacts_table;
mod m20240601_000004_create_audit_logs_table;
mod m20240601_000005_create_service_pages_table;
mod m20240601_000006_create_partner_logos_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_users_table::Migration),
            Box::new(m20240601_000002_create_orders_table::Migration),
            Box::new(m20240601_000003_create_contacts_table::Migration),
            Box::new(m20240601_000004_create_audit_logs_table::Migration),
            Box::new(m20240601_000005_create_service_pages_table::Migration),
            Box::new(m20240601_000006_create_partner_logos_table::Migration),
        ]
    }
}
