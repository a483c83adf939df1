//! Add a required engine_type column to cars
//!
//! Runs as three independent steps so it can be re-applied to databases
//! that already carry the column:
//! 1. add `engine_type VARCHAR(20)` as nullable ("already exists" is a no-op)
//! 2. backfill NULLs with `petrol`
//! 3. make the column NOT NULL, without a default

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DbBackend};
use tracing::info;

use super::m20240101_000001_create_cars::{base_columns, Cars};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        info!("Running migration: add engine_type to cars table");
        add_engine_type_column(manager).await?;
        backfill_engine_type(manager).await?;
        require_engine_type(manager).await?;
        info!("engine_type migration completed");
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Cars::Table)
                    .drop_column(Cars::EngineType)
                    .to_owned(),
            )
            .await
    }
}

/// Step 1. Returns `false` when the column was already there.
pub async fn add_engine_type_column(manager: &SchemaManager<'_>) -> Result<bool, DbErr> {
    let stmt = Table::alter()
        .table(Cars::Table)
        .add_column(ColumnDef::new(Cars::EngineType).string_len(20).null())
        .to_owned();

    match manager.alter_table(stmt).await {
        Ok(()) => {
            info!("Added engine_type column (nullable)");
            Ok(true)
        }
        Err(e) if is_duplicate_column(&e) => {
            info!("engine_type column already exists, skipping ADD");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Step 2. Returns the number of rows backfilled.
pub async fn backfill_engine_type(manager: &SchemaManager<'_>) -> Result<u64, DbErr> {
    let stmt = Query::update()
        .table(Cars::Table)
        .value(Cars::EngineType, "petrol")
        .and_where(Expr::col(Cars::EngineType).is_null())
        .to_owned();

    let db = manager.get_connection();
    let result = db.execute(db.get_database_backend().build(&stmt)).await?;
    info!(
        "Populated {} NULL engine_type values with 'petrol'",
        result.rows_affected()
    );
    Ok(result.rows_affected())
}

/// Step 3.
pub async fn require_engine_type(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    match manager.get_database_backend() {
        // SQLite cannot alter a column in place
        DbBackend::Sqlite => rebuild_cars_table(manager).await?,
        _ => {
            manager
                .alter_table(
                    Table::alter()
                        .table(Cars::Table)
                        .modify_column(ColumnDef::new(Cars::EngineType).string_len(20).not_null())
                        .to_owned(),
                )
                .await?
        }
    }
    info!("Modified engine_type to NOT NULL");
    Ok(())
}

/// Whether a failed ADD COLUMN only means the column is already present.
/// Covers the SQLite, MySQL and Postgres wording.
pub fn is_duplicate_column(err: &DbErr) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("duplicate column") || msg.contains("already exists")
}

async fn rebuild_cars_table(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .drop_table(Table::drop().table(CarsRebuild::Table).if_exists().to_owned())
        .await?;

    let mut table = Table::create();
    table.table(CarsRebuild::Table);
    base_columns(&mut table);
    table.col(ColumnDef::new(Cars::EngineType).string_len(20).not_null());
    manager.create_table(table).await?;

    let columns = [
        Cars::Id,
        Cars::Make,
        Cars::Model,
        Cars::Year,
        Cars::Color,
        Cars::Price,
        Cars::EngineType,
    ];
    let copy = Query::insert()
        .into_table(CarsRebuild::Table)
        .columns(columns)
        .select_from(Query::select().columns(columns).from(Cars::Table).to_owned())
        .map_err(|e| DbErr::Custom(e.to_string()))?
        .to_owned();
    manager.exec_stmt(copy).await?;

    manager
        .drop_table(Table::drop().table(Cars::Table).to_owned())
        .await?;
    manager
        .rename_table(Table::rename().table(CarsRebuild::Table, Cars::Table).to_owned())
        .await
}

#[derive(Iden)]
enum CarsRebuild {
    Table,
}
