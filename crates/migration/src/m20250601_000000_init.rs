//! Initial schema migration - creates all tables from scratch.
//!
//! Complete schema for cofrinho:
//!
//! - `users`: authentication
//! - `envelopes`: monthly percentage-funded budget buckets
//! - `transactions`: incomes and expenses
//! - `debts` / `amortizations`: liabilities and their payment history
//! - `goals` / `contributions`: savings targets and their deposit history
//! - `accounts`: bank accounts invoice payments draw from
//! - `cards` / `invoices`: credit cards and their billing cycles
//! - `wishlist_items`: planned purchases
//! - `recurring_items`: expected monthly/yearly movements

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Envelopes {
    Table,
    Id,
    UserId,
    Name,
    Month,
    TargetPercent,
    AllocatedCents,
    SpentCents,
    AvailableCents,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    Kind,
    AmountCents,
    OccurredOn,
    Description,
    EnvelopeId,
    CreatedAt,
}

#[derive(Iden)]
enum Debts {
    Table,
    Id,
    UserId,
    Description,
    OriginalCents,
    CurrentCents,
    MonthlyInterestBps,
    Status,
    StartedOn,
    SettledOn,
    EnvelopeId,
}

#[derive(Iden)]
enum Amortizations {
    Table,
    Id,
    DebtId,
    EnvelopeId,
    AmountCents,
    PaidOn,
    Note,
}

#[derive(Iden)]
enum Goals {
    Table,
    Id,
    UserId,
    Name,
    Description,
    TargetCents,
    CurrentCents,
    Status,
    DueOn,
    Priority,
    EnvelopeId,
}

#[derive(Iden)]
enum Contributions {
    Table,
    Id,
    GoalId,
    AmountCents,
    ContributedOn,
    EnvelopeId,
    Note,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    UserId,
    Name,
    Kind,
    InitialCents,
    BalanceCents,
}

#[derive(Iden)]
enum Cards {
    Table,
    Id,
    UserId,
    Name,
    Brand,
    LimitCents,
    AvailableLimitCents,
    ClosingDay,
    DueDay,
    Active,
}

#[derive(Iden)]
enum Invoices {
    Table,
    Id,
    CardId,
    Month,
    TotalCents,
    Status,
    ClosesOn,
    DueOn,
    PaidOn,
}

#[derive(Iden)]
enum WishlistItems {
    Table,
    Id,
    UserId,
    Description,
    EstimatedCents,
    MonthlyContributionCents,
    Status,
    EnvelopeId,
}

#[derive(Iden)]
enum RecurringItems {
    Table,
    Id,
    UserId,
    Kind,
    AmountCents,
    Description,
    DueDay,
    Frequency,
    Active,
    EnvelopeId,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Envelopes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Envelopes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Envelopes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Envelopes::UserId).string().not_null())
                    .col(ColumnDef::new(Envelopes::Name).string().not_null())
                    .col(ColumnDef::new(Envelopes::Month).string().not_null())
                    .col(
                        ColumnDef::new(Envelopes::TargetPercent)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Envelopes::AllocatedCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Envelopes::SpentCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Envelopes::AvailableCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-envelopes-user_id")
                            .from(Envelopes::Table, Envelopes::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-envelopes-user-name-month-unique")
                    .table(Envelopes::Table)
                    .col(Envelopes::UserId)
                    .col(Envelopes::Name)
                    .col(Envelopes::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-envelopes-user-month")
                    .table(Envelopes::Table)
                    .col(Envelopes::UserId)
                    .col(Envelopes::Month)
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
                    .col(ColumnDef::new(Transactions::UserId).string().not_null())
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::OccurredOn).date().not_null())
                    .col(ColumnDef::new(Transactions::Description).string())
                    .col(ColumnDef::new(Transactions::EnvelopeId).string())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-user_id")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-envelope_id")
                            .from(Transactions::Table, Transactions::EnvelopeId)
                            .to(Envelopes::Table, Envelopes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user-occurred_on")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::OccurredOn)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Debts + amortizations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Debts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Debts::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Debts::UserId).string().not_null())
                    .col(ColumnDef::new(Debts::Description).string().not_null())
                    .col(
                        ColumnDef::new(Debts::OriginalCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Debts::CurrentCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Debts::MonthlyInterestBps)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Debts::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Debts::StartedOn).date().not_null())
                    .col(ColumnDef::new(Debts::SettledOn).date())
                    .col(ColumnDef::new(Debts::EnvelopeId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-debts-user_id")
                            .from(Debts::Table, Debts::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Amortizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Amortizations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Amortizations::DebtId).string().not_null())
                    .col(
                        ColumnDef::new(Amortizations::EnvelopeId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Amortizations::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Amortizations::PaidOn).date().not_null())
                    .col(ColumnDef::new(Amortizations::Note).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-amortizations-debt_id")
                            .from(Amortizations::Table, Amortizations::DebtId)
                            .to(Debts::Table, Debts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-amortizations-debt_id")
                    .table(Amortizations::Table)
                    .col(Amortizations::DebtId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Goals + contributions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Goals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Goals::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Goals::UserId).string().not_null())
                    .col(ColumnDef::new(Goals::Name).string().not_null())
                    .col(ColumnDef::new(Goals::Description).string())
                    .col(ColumnDef::new(Goals::TargetCents).big_integer().not_null())
                    .col(
                        ColumnDef::new(Goals::CurrentCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Goals::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Goals::DueOn).date())
                    .col(ColumnDef::new(Goals::Priority).integer().not_null().default(1))
                    .col(ColumnDef::new(Goals::EnvelopeId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-goals-user_id")
                            .from(Goals::Table, Goals::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contributions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contributions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contributions::GoalId).string().not_null())
                    .col(
                        ColumnDef::new(Contributions::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contributions::ContributedOn)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contributions::EnvelopeId).string())
                    .col(ColumnDef::new(Contributions::Note).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-contributions-goal_id")
                            .from(Contributions::Table, Contributions::GoalId)
                            .to(Goals::Table, Goals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-contributions-goal_id")
                    .table(Contributions::Table)
                    .col(Contributions::GoalId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::UserId).string().not_null())
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(ColumnDef::new(Accounts::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::InitialCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Accounts::BalanceCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-accounts-user_id")
                            .from(Accounts::Table, Accounts::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Cards + invoices
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Cards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cards::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Cards::UserId).string().not_null())
                    .col(ColumnDef::new(Cards::Name).string().not_null())
                    .col(ColumnDef::new(Cards::Brand).string())
                    .col(ColumnDef::new(Cards::LimitCents).big_integer().not_null())
                    .col(
                        ColumnDef::new(Cards::AvailableLimitCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Cards::ClosingDay).integer().not_null())
                    .col(ColumnDef::new(Cards::DueDay).integer().not_null())
                    .col(
                        ColumnDef::new(Cards::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cards-user_id")
                            .from(Cards::Table, Cards::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invoices::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invoices::CardId).string().not_null())
                    .col(ColumnDef::new(Invoices::Month).string().not_null())
                    .col(
                        ColumnDef::new(Invoices::TotalCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Invoices::Status)
                            .string()
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(Invoices::ClosesOn).date().not_null())
                    .col(ColumnDef::new(Invoices::DueOn).date().not_null())
                    .col(ColumnDef::new(Invoices::PaidOn).date())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-invoices-card_id")
                            .from(Invoices::Table, Invoices::CardId)
                            .to(Cards::Table, Cards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-invoices-card-month-unique")
                    .table(Invoices::Table)
                    .col(Invoices::CardId)
                    .col(Invoices::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Wishlist
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(WishlistItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WishlistItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WishlistItems::UserId).string().not_null())
                    .col(
                        ColumnDef::new(WishlistItems::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WishlistItems::EstimatedCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WishlistItems::MonthlyContributionCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WishlistItems::Status)
                            .string()
                            .not_null()
                            .default("wanting"),
                    )
                    .col(ColumnDef::new(WishlistItems::EnvelopeId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wishlist_items-user_id")
                            .from(WishlistItems::Table, WishlistItems::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Recurring items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(RecurringItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecurringItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RecurringItems::UserId).string().not_null())
                    .col(ColumnDef::new(RecurringItems::Kind).string().not_null())
                    .col(
                        ColumnDef::new(RecurringItems::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringItems::Description)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecurringItems::DueDay).integer().not_null())
                    .col(
                        ColumnDef::new(RecurringItems::Frequency)
                            .string()
                            .not_null()
                            .default("monthly"),
                    )
                    .col(
                        ColumnDef::new(RecurringItems::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(RecurringItems::EnvelopeId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recurring_items-user_id")
                            .from(RecurringItems::Table, RecurringItems::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first, referenced tables last.
        manager
            .drop_table(Table::drop().table(RecurringItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WishlistItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cards::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contributions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Goals::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Amortizations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Debts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Envelopes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
