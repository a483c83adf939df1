//! Create cars table (without engine_type, see the next migration)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table.table(Cars::Table).if_not_exists();
        base_columns(&mut table);

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await
    }
}

/// Every cars column except `engine_type`.
pub(super) fn base_columns(table: &mut TableCreateStatement) {
    table
        .col(
            ColumnDef::new(Cars::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Cars::Make).string_len(50).not_null())
        .col(ColumnDef::new(Cars::Model).string_len(50).not_null())
        .col(ColumnDef::new(Cars::Year).integer().not_null())
        .col(ColumnDef::new(Cars::Color).string_len(30).not_null())
        .col(ColumnDef::new(Cars::Price).double().not_null());
}

#[derive(Iden, Clone, Copy)]
pub enum Cars {
    Table,
    Id,
    Make,
    Model,
    Year,
    Color,
    Price,
    EngineType,
}
