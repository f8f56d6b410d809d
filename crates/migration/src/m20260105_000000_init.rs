//! Initial schema migration.
//!
//! Creates the complete schema for Tesouraria:
//!
//! - `members`: member registry with the human-readable `D###` code
//! - `counters`: monotonic sequences (member codes are never handed out twice)
//! - `transactions`: payments received through the provider webhook
//! - `entries`: confirmed inflows (tithes, offerings, ...)
//! - `expense_types`: expense categories
//! - `expenses`: manually entered outflows

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Members {
    Table,
    Id,
    CodeSeq,
    Code,
    FullName,
    BirthDate,
    Phone,
    Email,
    Address,
    RegisteredAt,
}

#[derive(Iden)]
enum Counters {
    Table,
    Name,
    Value,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    ExternalId,
    AmountMinor,
    OccurredAt,
    PayerName,
    PayerEmail,
    ProviderStatus,
    PaymentMethod,
    Description,
    Status,
    Kind,
    Linked,
    MemberId,
    MemberCode,
}

#[derive(Iden)]
enum Entries {
    Table,
    Id,
    OccurredAt,
    AmountMinor,
    Kind,
    Description,
    MemberId,
    TransactionId,
}

#[derive(Iden)]
enum ExpenseTypes {
    Table,
    Id,
    Name,
    NameNorm,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    OccurredAt,
    AmountMinor,
    ExpenseTypeId,
    Description,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Members
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Members::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Members::CodeSeq)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Members::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Members::FullName).string().not_null())
                    .col(ColumnDef::new(Members::BirthDate).date())
                    .col(ColumnDef::new(Members::Phone).string())
                    .col(ColumnDef::new(Members::Email).string())
                    .col(ColumnDef::new(Members::Address).string())
                    .col(
                        ColumnDef::new(Members::RegisteredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Counters
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Counters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Counters::Name)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Counters::Value).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::ExternalId).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::PayerName).string().not_null())
                    .col(ColumnDef::new(Transactions::PayerEmail).string())
                    .col(ColumnDef::new(Transactions::ProviderStatus).string())
                    .col(ColumnDef::new(Transactions::PaymentMethod).string())
                    .col(ColumnDef::new(Transactions::Description).string())
                    .col(ColumnDef::new(Transactions::Status).string().not_null())
                    .col(ColumnDef::new(Transactions::Kind).string())
                    .col(
                        ColumnDef::new(Transactions::Linked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Transactions::MemberId).string())
                    .col(ColumnDef::new(Transactions::MemberCode).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-member_id")
                            .from(Transactions::Table, Transactions::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-status-occurred_at")
                    .table(Transactions::Table)
                    .col(Transactions::Status)
                    .col(Transactions::OccurredAt)
                    .to_owned(),
            )
            .await?;

        // Not unique: the same payment may be delivered more than once.
        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-external_id")
                    .table(Transactions::Table)
                    .col(Transactions::ExternalId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Entries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Entries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Entries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Entries::OccurredAt).timestamp().not_null())
                    .col(ColumnDef::new(Entries::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Entries::Kind).string().not_null())
                    .col(ColumnDef::new(Entries::Description).string().not_null())
                    .col(ColumnDef::new(Entries::MemberId).string())
                    .col(ColumnDef::new(Entries::TransactionId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-entries-member_id")
                            .from(Entries::Table, Entries::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-entries-transaction_id")
                            .from(Entries::Table, Entries::TransactionId)
                            .to(Transactions::Table, Transactions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-entries-occurred_at")
                    .table(Entries::Table)
                    .col(Entries::OccurredAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Expense types
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ExpenseTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseTypes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExpenseTypes::Name).string().not_null())
                    .col(
                        ColumnDef::new(ExpenseTypes::NameNorm)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::OccurredAt).timestamp().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::ExpenseTypeId).string())
                    .col(ColumnDef::new(Expenses::Description).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-expense_type_id")
                            .from(Expenses::Table, Expenses::ExpenseTypeId)
                            .to(ExpenseTypes::Table, ExpenseTypes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-occurred_at")
                    .table(Expenses::Table)
                    .col(Expenses::OccurredAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Entries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Counters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;
        Ok(())
    }
}
