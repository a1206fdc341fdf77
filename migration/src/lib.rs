pub use sea_orm_migration::prelude::*;

mod m20260110_090000_create_users_table;
mod m20260110_090500_create_credentials_table;
mod m20260110_091000_create_personal_infos_table;
mod m20260110_091500_create_emergency_contacts_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260110_090000_create_users_table::Migration),
            Box::new(m20260110_090500_create_credentials_table::Migration),
            Box::new(m20260110_091000_create_personal_infos_table::Migration),
            Box::new(m20260110_091500_create_emergency_contacts_table::Migration),
        ]
    }
}
