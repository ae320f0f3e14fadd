pub use sea_orm_migration::prelude::*;

mod m20260101_000001_create_users_table;
mod m20260101_000002_create_profiles_and_links;
mod m20260101_000003_create_nfc_tags_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_users_table::Migration),
            Box::new(m20260101_000002_create_profiles_and_links::Migration),
            Box::new(m20260101_000003_create_nfc_tags_table::Migration),
        ]
    }
}
