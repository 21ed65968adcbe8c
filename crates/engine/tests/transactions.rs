use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    ConfigureEnvelopesCmd, CreateTransactionCmd, Engine, EngineError, Envelope, EnvelopeTarget,
    Month, TransactionKind, TransactionListFilter, UpdateTransactionCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

fn month() -> Month {
    "2025-03".parse().unwrap()
}

/// The 30/15/55 setup used across scenarios.
async fn configured_engine() -> (Engine, DatabaseConnection) {
    let (engine, db) = engine_with_db().await;
    engine
        .configure_envelopes(ConfigureEnvelopesCmd {
            user_id: "alice".to_string(),
            month: month(),
            targets: vec![
                EnvelopeTarget {
                    name: "Investimentos".to_string(),
                    target_percent: 30,
                },
                EnvelopeTarget {
                    name: "Lazer".to_string(),
                    target_percent: 15,
                },
                EnvelopeTarget {
                    name: "Custos".to_string(),
                    target_percent: 55,
                },
            ],
        })
        .await
        .unwrap();
    (engine, db)
}

async fn envelope_named(engine: &Engine, name: &str) -> Envelope {
    engine
        .list_envelopes("alice", &month())
        .await
        .unwrap()
        .into_iter()
        .find(|e| e.name == name)
        .unwrap_or_else(|| panic!("missing envelope {name}"))
}

#[tokio::test]
async fn income_transaction_distributes_over_month() {
    let (engine, _db) = configured_engine().await;

    engine
        .create_transaction(
            CreateTransactionCmd::new("alice", TransactionKind::Income, 100_000, date(5))
                .description("Salary"),
        )
        .await
        .unwrap();

    assert_eq!(
        envelope_named(&engine, "Investimentos").await.allocated_cents,
        30_000
    );
    assert_eq!(envelope_named(&engine, "Lazer").await.allocated_cents, 15_000);
    assert_eq!(envelope_named(&engine, "Custos").await.allocated_cents, 55_000);
}

#[tokio::test]
async fn income_into_unconfigured_month_fails_and_inserts_nothing() {
    let (engine, _db) = configured_engine().await;

    // April has no envelopes; the insert must roll back with the allocation.
    let err = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            100_000,
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::NoEnvelopesConfigured("2025-04".to_string())
    );

    let transactions = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap();
    assert!(transactions.is_empty());
}

#[tokio::test]
async fn expense_requires_envelope() {
    let (engine, _db) = configured_engine().await;

    let err = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            10_000,
            date(6),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn expense_debits_envelope_and_overspend_is_observable() {
    let (engine, _db) = configured_engine().await;
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            100_000,
            date(1),
        ))
        .await
        .unwrap();

    let custos = envelope_named(&engine, "Custos").await;
    assert_eq!(custos.allocated_cents, 55_000);

    // Spend beyond the allocation: succeeds, goes negative.
    engine
        .create_transaction(
            CreateTransactionCmd::new("alice", TransactionKind::Expense, 60_000, date(10))
                .envelope_id(custos.id)
                .description("Rent"),
        )
        .await
        .unwrap();

    let custos = envelope_named(&engine, "Custos").await;
    assert_eq!(custos.spent_cents, 60_000);
    assert_eq!(custos.available_cents, -5_000);
}

#[tokio::test]
async fn delete_expense_restores_balances_exactly() {
    let (engine, _db) = configured_engine().await;
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            100_000,
            date(1),
        ))
        .await
        .unwrap();

    let custos = envelope_named(&engine, "Custos").await;
    engine
        .create_transaction(
            CreateTransactionCmd::new("alice", TransactionKind::Expense, 40_000, date(10))
                .envelope_id(custos.id),
        )
        .await
        .unwrap();
    let tx = engine
        .create_transaction(
            CreateTransactionCmd::new("alice", TransactionKind::Expense, 20_000, date(12))
                .envelope_id(custos.id),
        )
        .await
        .unwrap();

    let before = envelope_named(&engine, "Custos").await;
    assert_eq!(before.spent_cents, 60_000);
    assert_eq!(before.available_cents, -5_000);

    engine.delete_transaction("alice", tx.id).await.unwrap();

    // Back to exactly the pre-creation state, overspend gone.
    let after = envelope_named(&engine, "Custos").await;
    assert_eq!(after.spent_cents, 40_000);
    assert_eq!(after.available_cents, 15_000);
}

#[tokio::test]
async fn delete_income_retracts_allocation() {
    let (engine, _db) = configured_engine().await;
    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            100_000,
            date(1),
        ))
        .await
        .unwrap();

    engine.delete_transaction("alice", tx.id).await.unwrap();

    for name in ["Investimentos", "Lazer", "Custos"] {
        let envelope = envelope_named(&engine, name).await;
        assert_eq!(envelope.allocated_cents, 0);
        assert_eq!(envelope.available_cents, 0);
    }
}

#[tokio::test]
async fn edit_to_identical_values_changes_nothing() {
    let (engine, _db) = configured_engine().await;
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            100_000,
            date(1),
        ))
        .await
        .unwrap();
    let custos = envelope_named(&engine, "Custos").await;
    let tx = engine
        .create_transaction(
            CreateTransactionCmd::new("alice", TransactionKind::Expense, 20_000, date(10))
                .envelope_id(custos.id),
        )
        .await
        .unwrap();

    let before = engine.list_envelopes("alice", &month()).await.unwrap();

    engine
        .update_transaction(
            UpdateTransactionCmd::new("alice", tx.id)
                .amount_cents(20_000)
                .occurred_on(date(10))
                .envelope_id(custos.id),
        )
        .await
        .unwrap();

    let after = engine.list_envelopes("alice", &month()).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn edit_amount_applies_delta() {
    let (engine, _db) = configured_engine().await;
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            100_000,
            date(1),
        ))
        .await
        .unwrap();
    let custos = envelope_named(&engine, "Custos").await;
    let tx = engine
        .create_transaction(
            CreateTransactionCmd::new("alice", TransactionKind::Expense, 20_000, date(10))
                .envelope_id(custos.id),
        )
        .await
        .unwrap();

    engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx.id).amount_cents(35_000))
        .await
        .unwrap();

    let custos = envelope_named(&engine, "Custos").await;
    assert_eq!(custos.spent_cents, 35_000);
    assert_eq!(custos.available_cents, 20_000);
}

#[tokio::test]
async fn edit_income_date_moves_allocation_between_months() {
    let (engine, _db) = configured_engine().await;
    let april: Month = "2025-04".parse().unwrap();
    engine
        .configure_envelopes(ConfigureEnvelopesCmd {
            user_id: "alice".to_string(),
            month: april.clone(),
            targets: vec![EnvelopeTarget {
                name: "Custos".to_string(),
                target_percent: 100,
            }],
        })
        .await
        .unwrap();

    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            100_000,
            date(31),
        ))
        .await
        .unwrap();

    // Move the income to April: March must be retracted, April credited.
    engine
        .update_transaction(
            UpdateTransactionCmd::new("alice", tx.id)
                .occurred_on(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()),
        )
        .await
        .unwrap();

    let march_total: i64 = engine
        .list_envelopes("alice", &month())
        .await
        .unwrap()
        .iter()
        .map(|e| e.allocated_cents)
        .sum();
    assert_eq!(march_total, 0);

    let april_envelopes = engine.list_envelopes("alice", &april).await.unwrap();
    assert_eq!(april_envelopes[0].allocated_cents, 100_000);
}

#[tokio::test]
async fn edit_expense_envelope_moves_the_debit() {
    let (engine, _db) = configured_engine().await;
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            100_000,
            date(1),
        ))
        .await
        .unwrap();
    let custos = envelope_named(&engine, "Custos").await;
    let lazer = envelope_named(&engine, "Lazer").await;

    let tx = engine
        .create_transaction(
            CreateTransactionCmd::new("alice", TransactionKind::Expense, 10_000, date(10))
                .envelope_id(custos.id),
        )
        .await
        .unwrap();

    engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx.id).envelope_id(lazer.id))
        .await
        .unwrap();

    assert_eq!(envelope_named(&engine, "Custos").await.spent_cents, 0);
    assert_eq!(envelope_named(&engine, "Lazer").await.spent_cents, 10_000);
}

#[tokio::test]
async fn failed_edit_leaves_everything_untouched() {
    let (engine, _db) = configured_engine().await;
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            100_000,
            date(1),
        ))
        .await
        .unwrap();
    let custos = envelope_named(&engine, "Custos").await;
    let tx = engine
        .create_transaction(
            CreateTransactionCmd::new("alice", TransactionKind::Expense, 20_000, date(10))
                .envelope_id(custos.id),
        )
        .await
        .unwrap();

    let before = engine.list_envelopes("alice", &month()).await.unwrap();

    // Moving an income-less expense into an unconfigured month is fine, but a
    // non-positive amount must fail after the reversal already ran - and roll
    // everything back.
    let err = engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx.id).amount_cents(-1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let after = engine.list_envelopes("alice", &month()).await.unwrap();
    assert_eq!(before, after);

    let transactions = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap();
    let kept = transactions.iter().find(|t| t.id == tx.id).unwrap();
    assert_eq!(kept.amount_cents, 20_000);
}

#[tokio::test]
async fn transactions_of_other_users_are_invisible() {
    let (engine, db) = configured_engine().await;
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["bob".into(), "password".into()],
    ))
    .await
    .unwrap();

    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            100_000,
            date(1),
        ))
        .await
        .unwrap();
    let tx = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap()
        .remove(0);

    let err = engine.delete_transaction("bob", tx.id).await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("transaction".to_string()));

    let err = engine
        .delete_transaction("alice", Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("transaction".to_string()));
}

#[tokio::test]
async fn list_filters_by_kind_and_envelope() {
    let (engine, _db) = configured_engine().await;
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            100_000,
            date(1),
        ))
        .await
        .unwrap();
    let custos = envelope_named(&engine, "Custos").await;
    engine
        .create_transaction(
            CreateTransactionCmd::new("alice", TransactionKind::Expense, 5_000, date(3))
                .envelope_id(custos.id),
        )
        .await
        .unwrap();

    let expenses = engine
        .list_transactions(
            "alice",
            &TransactionListFilter {
                kind: Some(TransactionKind::Expense),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].envelope_id, Some(custos.id));

    let by_envelope = engine
        .list_transactions(
            "alice",
            &TransactionListFilter {
                envelope_id: Some(custos.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_envelope.len(), 1);
}

#[tokio::test]
async fn monthly_summary_aggregates_by_kind() {
    let (engine, _db) = configured_engine().await;
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            100_000,
            date(1),
        ))
        .await
        .unwrap();
    let custos = envelope_named(&engine, "Custos").await;
    engine
        .create_transaction(
            CreateTransactionCmd::new("alice", TransactionKind::Expense, 5_000, date(3))
                .envelope_id(custos.id),
        )
        .await
        .unwrap();
    engine
        .create_transaction(
            CreateTransactionCmd::new("alice", TransactionKind::Expense, 7_000, date(20))
                .envelope_id(custos.id),
        )
        .await
        .unwrap();

    let summary = engine.monthly_summary("alice", &month()).await.unwrap();
    assert_eq!(summary.total_income_cents, 100_000);
    assert_eq!(summary.total_expense_cents, 12_000);
    assert_eq!(summary.net_cents, 88_000);
    assert_eq!(summary.income_count, 1);
    assert_eq!(summary.expense_count, 2);
}

#[tokio::test]
async fn deleting_envelope_removes_its_transactions_and_unlinks_the_rest() {
    let (engine, _db) = configured_engine().await;
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            TransactionKind::Income,
            100_000,
            date(1),
        ))
        .await
        .unwrap();
    let custos = envelope_named(&engine, "Custos").await;
    engine
        .create_transaction(
            CreateTransactionCmd::new("alice", TransactionKind::Expense, 5_000, date(3))
                .envelope_id(custos.id),
        )
        .await
        .unwrap();

    engine.delete_envelope("alice", custos.id).await.unwrap();

    let envelopes = engine.list_envelopes("alice", &month()).await.unwrap();
    assert_eq!(envelopes.len(), 2);

    // The expense went away with its envelope; the income survives.
    let transactions = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].kind, TransactionKind::Income);
}
