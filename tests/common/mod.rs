#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use coinbook::entities::{TransactionType, balance, transaction};
use sea_orm::{ActiveModelTrait, ActiveValue::{NotSet, Set}, Database, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    init_tracing();
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness; set `RUST_LOG=debug` to
/// see dropped filters.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .expect("valid timestamp")
}

pub async fn insert_balance(
    db: &DatabaseConnection,
    user_id: i64,
    description: &str,
    currency: &str,
) -> balance::Model {
    let now = at(2024, 1, 1, 0, 0);
    balance::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        balance: Set(1_000.0),
        description: Set(description.to_string()),
        currency: Set(currency.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert balance")
}

pub async fn insert_transaction(
    db: &DatabaseConnection,
    balance_id: i64,
    kind: TransactionType,
    amount: f64,
    description: &str,
    date: NaiveDateTime,
) -> transaction::Model {
    transaction::ActiveModel {
        id: NotSet,
        balance_id: Set(balance_id),
        kind: Set(kind),
        amount: Set(amount),
        description: Set(description.to_string()),
        date: Set(date),
        created_at: Set(date),
        updated_at: Set(date),
    }
    .insert(db)
    .await
    .expect("Failed to insert transaction")
}

/// Two users; user 1 owns a TND and a EUR balance, user 2 owns one USD balance.
///
/// | id | owner | type | amount | description | date |
/// |---|---|---|---|---|---|
/// | 1 | 1 | groceries | 42.5 | Weekly groceries | 2024-01-05 10:00 |
/// | 2 | 1 | housing | 800 | January rent | 2024-01-01 09:00 |
/// | 3 | 1 | utilities | 60 | Electricity bill | 2024-01-20 18:30 |
/// | 4 | 1 | groceries | 12 | Groceries top-up | 2024-02-08 23:45 |
/// | 5 | 1 | debt | 150 | Loan 100% repayment | 2024-02-15 12:00 |
/// | 6 | 2 | groceries | 30 | Other user's groceries | 2024-01-10 08:00 |
pub async fn seed_ledger(db: &DatabaseConnection) {
    let tnd = insert_balance(db, 1, "Main account", "TND").await;
    let eur = insert_balance(db, 1, "Travel savings", "EUR").await;
    let other = insert_balance(db, 2, "Main account", "USD").await;

    insert_transaction(db, tnd.id, TransactionType::Groceries, 42.5, "Weekly groceries", at(2024, 1, 5, 10, 0)).await;
    insert_transaction(db, tnd.id, TransactionType::Housing, 800.0, "January rent", at(2024, 1, 1, 9, 0)).await;
    insert_transaction(db, tnd.id, TransactionType::Utilities, 60.0, "Electricity bill", at(2024, 1, 20, 18, 30)).await;
    insert_transaction(db, eur.id, TransactionType::Groceries, 12.0, "Groceries top-up", at(2024, 2, 8, 23, 45)).await;
    insert_transaction(db, eur.id, TransactionType::Debt, 150.0, "Loan 100% repayment", at(2024, 2, 15, 12, 0)).await;
    insert_transaction(db, other.id, TransactionType::Groceries, 30.0, "Other user's groceries", at(2024, 1, 10, 8, 0)).await;
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateBalancesTable), Box::new(CreateTransactionsTable)]
    }
}

pub struct CreateBalancesTable;

impl MigrationName for CreateBalancesTable {
    fn name(&self) -> &'static str {
        "m20250227_222324_create_balances_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateBalancesTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Balances::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Balances::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Balances::UserId).integer().not_null())
            .col(ColumnDef::new(Balances::Balance).double().not_null())
            .col(ColumnDef::new(Balances::Description).string().not_null())
            .col(
                ColumnDef::new(Balances::Currency)
                    .string_len(3)
                    .not_null()
                    .default(balance::DEFAULT_CURRENCY),
            )
            .col(ColumnDef::new(Balances::CreatedAt).date_time().not_null())
            .col(ColumnDef::new(Balances::UpdatedAt).date_time().not_null())
            .to_owned();

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Balances::Table).to_owned())
            .await
    }
}

pub struct CreateTransactionsTable;

impl MigrationName for CreateTransactionsTable {
    fn name(&self) -> &'static str {
        "m20250227_222325_create_transactions_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateTransactionsTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Transactions::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Transactions::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Transactions::BalanceId).integer().not_null())
            .col(ColumnDef::new(Transactions::Type).string_len(20).not_null())
            .col(ColumnDef::new(Transactions::Amount).double().not_null())
            .col(ColumnDef::new(Transactions::Description).string().not_null())
            .col(ColumnDef::new(Transactions::Date).date_time().not_null())
            .col(ColumnDef::new(Transactions::CreatedAt).date_time().not_null())
            .col(ColumnDef::new(Transactions::UpdatedAt).date_time().not_null())
            .foreign_key(
                ForeignKey::create()
                    .from(Transactions::Table, Transactions::BalanceId)
                    .to(Balances::Table, Balances::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Balances {
    Table,
    Id,
    UserId,
    Balance,
    Description,
    Currency,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    BalanceId,
    #[sea_orm(iden = "type")]
    Type,
    Amount,
    Description,
    Date,
    CreatedAt,
    UpdatedAt,
}
