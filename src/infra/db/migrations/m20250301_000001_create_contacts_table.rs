//! Migration: Create the contacts table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contacts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contacts::FullName).string_len(100).not_null())
                    .col(ColumnDef::new(Contacts::Address).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::City).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::State).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::ZipCode).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::PhoneNumber).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Contacts {
    Table,
    Id,
    FullName,
    Address,
    City,
    State,
    ZipCode,
    PhoneNumber,
}
