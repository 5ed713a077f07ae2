//! Ledger schema.
//!
//! - `parties`: every tracked person, the owner included
//! - `item_health`: learned healthiness per normalized item name
//! - `expenses`: the owner's spending
//! - `obligations`: debts from a borrower to a lender
//! - `payments`: repayment chunks, each against one obligation

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Parties {
    Table,
    Id,
    Name,
    NameNorm,
    Contact,
}

#[derive(Iden)]
enum ItemHealth {
    Table,
    ItemNorm,
    IsHealthy,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    Date,
    Item,
    AmountMinor,
    Category,
    IsHealthy,
}

#[derive(Iden)]
enum Obligations {
    Table,
    Id,
    Date,
    BorrowerId,
    LenderId,
    AmountMinor,
    Description,
    Status,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    Date,
    ObligationId,
    PayerId,
    AmountMinor,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Parties
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Parties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Parties::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Parties::Name).string().not_null())
                    .col(ColumnDef::new(Parties::NameNorm).string().not_null())
                    .col(ColumnDef::new(Parties::Contact).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-parties-name_norm")
                    .table(Parties::Table)
                    .col(Parties::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Item health facts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ItemHealth::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ItemHealth::ItemNorm)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ItemHealth::IsHealthy).boolean().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::Date).date().not_null())
                    .col(ColumnDef::new(Expenses::Item).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Expenses::Category)
                            .string()
                            .not_null()
                            .default("General"),
                    )
                    .col(ColumnDef::new(Expenses::IsHealthy).boolean())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-date")
                    .table(Expenses::Table)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Obligations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Obligations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Obligations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Obligations::Date).date().not_null())
                    .col(ColumnDef::new(Obligations::BorrowerId).integer().not_null())
                    .col(ColumnDef::new(Obligations::LenderId).integer().not_null())
                    .col(
                        ColumnDef::new(Obligations::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Obligations::Description)
                            .string()
                            .not_null()
                            .default("Loan"),
                    )
                    .col(
                        ColumnDef::new(Obligations::Status)
                            .string()
                            .not_null()
                            .default("Active"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-obligations-borrower_id")
                            .from(Obligations::Table, Obligations::BorrowerId)
                            .to(Parties::Table, Parties::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-obligations-lender_id")
                            .from(Obligations::Table, Obligations::LenderId)
                            .to(Parties::Table, Parties::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-obligations-pair-status")
                    .table(Obligations::Table)
                    .col(Obligations::BorrowerId)
                    .col(Obligations::LenderId)
                    .col(Obligations::Status)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Payments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::Date).date().not_null())
                    .col(ColumnDef::new(Payments::ObligationId).integer().not_null())
                    .col(ColumnDef::new(Payments::PayerId).integer().not_null())
                    .col(
                        ColumnDef::new(Payments::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-obligation_id")
                            .from(Payments::Table, Payments::ObligationId)
                            .to(Obligations::Table, Obligations::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-payer_id")
                            .from(Payments::Table, Payments::PayerId)
                            .to(Parties::Table, Parties::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-obligation_id")
                    .table(Payments::Table)
                    .col(Payments::ObligationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse creation order (FK dependencies)
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Obligations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ItemHealth::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Parties::Table).to_owned())
            .await?;
        Ok(())
    }
}
