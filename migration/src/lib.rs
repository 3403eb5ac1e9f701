pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_grading_tables;
mod m20250614_000001_add_test_result_stats;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_grading_tables::Migration),
            Box::new(m20250614_000001_add_test_result_stats::Migration),
        ]
    }
}
