//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_cars;
pub mod m20240101_000002_add_engine_type;

pub use m20240101_000002_add_engine_type::{
    add_engine_type_column, backfill_engine_type, is_duplicate_column, require_engine_type,
};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_cars::Migration),
            Box::new(m20240101_000002_add_engine_type::Migration),
        ]
    }
}
