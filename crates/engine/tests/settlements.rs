use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    AmortizeDebtCmd, ConfigureEnvelopesCmd, ContributeToGoalCmd, Engine, EngineError,
    EnvelopeTarget, DebtStatus, GoalStatus, InvoiceStatus, Month, NewCardCmd, NewDebtCmd,
    NewGoalCmd, NewWishlistItemCmd, PayInvoiceCmd, PurchaseWishlistItemCmd, TransactionKind,
    TransactionListFilter, WishlistStatus,
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

/// One funded envelope to settle from.
async fn funded_envelope(engine: &Engine) -> Uuid {
    engine
        .configure_envelopes(ConfigureEnvelopesCmd {
            user_id: "alice".to_string(),
            month: month(),
            targets: vec![EnvelopeTarget {
                name: "Dividas".to_string(),
                target_percent: 100,
            }],
        })
        .await
        .unwrap();
    let envelopes = engine
        .allocate_income("alice", &month(), 200_000)
        .await
        .unwrap();
    envelopes[0].id
}

async fn envelope_state(engine: &Engine, id: Uuid) -> (i64, i64, i64) {
    let envelope = engine
        .list_envelopes("alice", &month())
        .await
        .unwrap()
        .into_iter()
        .find(|e| e.id == id)
        .unwrap();
    (
        envelope.allocated_cents,
        envelope.spent_cents,
        envelope.available_cents,
    )
}

#[tokio::test]
async fn amortization_floors_at_zero_and_settles() {
    let (engine, _db) = engine_with_db().await;
    let envelope_id = funded_envelope(&engine).await;

    let debt = engine
        .create_debt(NewDebtCmd {
            user_id: "alice".to_string(),
            description: "Emprestimo".to_string(),
            original_cents: 100_000,
            monthly_interest_bps: 150,
            started_on: date(1),
            envelope_id: Some(envelope_id),
        })
        .await
        .unwrap();
    assert_eq!(debt.current_cents, 100_000);
    assert_eq!(debt.status, DebtStatus::Pending);

    let debt = engine
        .amortize_debt(AmortizeDebtCmd {
            user_id: "alice".to_string(),
            debt_id: debt.id,
            envelope_id,
            amount_cents: 40_000,
            paid_on: date(5),
            note: None,
        })
        .await
        .unwrap();
    assert_eq!(debt.current_cents, 60_000);
    assert_eq!(debt.status, DebtStatus::Pending);
    assert_eq!(debt.settled_on, None);

    // Overpay: floors at 0, settles, stamps the payment date.
    let debt = engine
        .amortize_debt(AmortizeDebtCmd {
            user_id: "alice".to_string(),
            debt_id: debt.id,
            envelope_id,
            amount_cents: 70_000,
            paid_on: date(20),
            note: Some("final".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(debt.current_cents, 0);
    assert_eq!(debt.status, DebtStatus::Settled);
    assert_eq!(debt.settled_on, Some(date(20)));

    // Both payments were debited from the envelope in full.
    let (allocated, spent, available) = envelope_state(&engine, envelope_id).await;
    assert_eq!(allocated, 200_000);
    assert_eq!(spent, 110_000);
    assert_eq!(available, 90_000);

    let amortizations = engine
        .list_amortizations("alice", debt.id)
        .await
        .unwrap();
    assert_eq!(amortizations.len(), 2);
    assert_eq!(amortizations[0].amount_cents, 70_000);
}

#[tokio::test]
async fn settled_debt_rejects_further_amortization() {
    let (engine, _db) = engine_with_db().await;
    let envelope_id = funded_envelope(&engine).await;

    let debt = engine
        .create_debt(NewDebtCmd {
            user_id: "alice".to_string(),
            description: "Cartao antigo".to_string(),
            original_cents: 50_000,
            monthly_interest_bps: 0,
            started_on: date(1),
            envelope_id: None,
        })
        .await
        .unwrap();
    engine
        .amortize_debt(AmortizeDebtCmd {
            user_id: "alice".to_string(),
            debt_id: debt.id,
            envelope_id,
            amount_cents: 50_000,
            paid_on: date(5),
            note: None,
        })
        .await
        .unwrap();

    let err = engine
        .amortize_debt(AmortizeDebtCmd {
            user_id: "alice".to_string(),
            debt_id: debt.id,
            envelope_id,
            amount_cents: 1_000,
            paid_on: date(6),
            note: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::AlreadySettled("Cartao antigo".to_string()));

    // The rejected payment touched nothing.
    let (_, spent, _) = envelope_state(&engine, envelope_id).await;
    assert_eq!(spent, 50_000);
}

#[tokio::test]
async fn amortizing_someone_elses_debt_is_not_found() {
    let (engine, db) = engine_with_db().await;
    let envelope_id = funded_envelope(&engine).await;
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["bob".into(), "password".into()],
    ))
    .await
    .unwrap();

    let debt = engine
        .create_debt(NewDebtCmd {
            user_id: "bob".to_string(),
            description: "Bob's".to_string(),
            original_cents: 10_000,
            monthly_interest_bps: 0,
            started_on: date(1),
            envelope_id: None,
        })
        .await
        .unwrap();

    let err = engine
        .amortize_debt(AmortizeDebtCmd {
            user_id: "alice".to_string(),
            debt_id: debt.id,
            envelope_id,
            amount_cents: 1_000,
            paid_on: date(2),
            note: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("debt".to_string()));
}

#[tokio::test]
async fn goal_completes_exactly_at_target_and_accepts_overflow() {
    let (engine, _db) = engine_with_db().await;
    let envelope_id = funded_envelope(&engine).await;

    let goal = engine
        .create_goal(NewGoalCmd {
            user_id: "alice".to_string(),
            name: "Viagem".to_string(),
            description: None,
            target_cents: 100_000,
            due_on: None,
            priority: 3,
            envelope_id: Some(envelope_id),
        })
        .await
        .unwrap();

    let goal_after = engine
        .contribute_to_goal(ContributeToGoalCmd {
            user_id: "alice".to_string(),
            goal_id: goal.id,
            amount_cents: 99_999,
            contributed_on: date(5),
            envelope_id: Some(envelope_id),
            note: None,
        })
        .await
        .unwrap();
    assert_eq!(goal_after.status, GoalStatus::Active);

    let goal_after = engine
        .contribute_to_goal(ContributeToGoalCmd {
            user_id: "alice".to_string(),
            goal_id: goal.id,
            amount_cents: 1,
            contributed_on: date(6),
            envelope_id: None,
            note: None,
        })
        .await
        .unwrap();
    assert_eq!(goal_after.status, GoalStatus::Completed);
    assert_eq!(goal_after.current_cents, 100_000);

    // No cap: contributing past completion keeps incrementing.
    let goal_after = engine
        .contribute_to_goal(ContributeToGoalCmd {
            user_id: "alice".to_string(),
            goal_id: goal.id,
            amount_cents: 5_000,
            contributed_on: date(7),
            envelope_id: None,
            note: None,
        })
        .await
        .unwrap();
    assert_eq!(goal_after.status, GoalStatus::Completed);
    assert_eq!(goal_after.current_cents, 105_000);

    // Only the first contribution named an envelope.
    let (_, spent, _) = envelope_state(&engine, envelope_id).await;
    assert_eq!(spent, 99_999);

    let contributions = engine.list_contributions("alice", goal.id).await.unwrap();
    assert_eq!(contributions.len(), 3);
}

#[tokio::test]
async fn invoice_payment_moves_account_and_card_limit() {
    let (engine, _db) = engine_with_db().await;

    let account = engine
        .create_account("alice", "Corrente", "checking", 300_000)
        .await
        .unwrap();
    let card = engine
        .create_card(NewCardCmd {
            user_id: "alice".to_string(),
            name: "Visa".to_string(),
            brand: Some("Visa".to_string()),
            limit_cents: 500_000,
            closing_day: 10,
            due_day: 20,
        })
        .await
        .unwrap();

    // Day 5 is before closing day 10: the current invoice is March's.
    let invoice = engine
        .current_invoice("alice", card.id, date(5))
        .await
        .unwrap();
    assert_eq!(invoice.month, month());
    assert_eq!(invoice.total_cents, 0);

    let invoice = engine
        .charge_invoice("alice", card.id, invoice.id, 120_000)
        .await
        .unwrap();
    assert_eq!(invoice.total_cents, 120_000);

    let cards = engine.list_cards("alice").await.unwrap();
    assert_eq!(cards[0].available_limit_cents, 380_000);

    // Partial payment: stays open.
    let invoice = engine
        .pay_invoice(PayInvoiceCmd {
            user_id: "alice".to_string(),
            card_id: card.id,
            invoice_id: invoice.id,
            account_id: account.id,
            amount_cents: 50_000,
            paid_on: date(21),
        })
        .await
        .unwrap();
    assert_eq!(invoice.total_cents, 70_000);
    assert_eq!(invoice.status, InvoiceStatus::Open);

    // Overpay the rest: floors at zero, flips to paid.
    let invoice = engine
        .pay_invoice(PayInvoiceCmd {
            user_id: "alice".to_string(),
            card_id: card.id,
            invoice_id: invoice.id,
            account_id: account.id,
            amount_cents: 80_000,
            paid_on: date(22),
        })
        .await
        .unwrap();
    assert_eq!(invoice.total_cents, 0);
    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert_eq!(invoice.paid_on, Some(date(22)));

    // Account was debited by both payments; overdraft would be allowed.
    let accounts = engine.list_accounts("alice").await.unwrap();
    assert_eq!(accounts[0].balance_cents, 170_000);

    // The card limit got the full 130_000 back on top of the earlier charge.
    let cards = engine.list_cards("alice").await.unwrap();
    assert_eq!(cards[0].available_limit_cents, 510_000);
}

#[tokio::test]
async fn current_invoice_rolls_to_next_month_after_closing_day() {
    let (engine, _db) = engine_with_db().await;
    let card = engine
        .create_card(NewCardCmd {
            user_id: "alice".to_string(),
            name: "Master".to_string(),
            brand: None,
            limit_cents: 100_000,
            closing_day: 10,
            due_day: 20,
        })
        .await
        .unwrap();

    let invoice = engine
        .current_invoice("alice", card.id, date(15))
        .await
        .unwrap();
    assert_eq!(invoice.month, "2025-04".parse().unwrap());

    // Find-or-create: asking again returns the same invoice.
    let again = engine
        .current_invoice("alice", card.id, date(16))
        .await
        .unwrap();
    assert_eq!(again.id, invoice.id);
}

#[tokio::test]
async fn wishlist_purchase_debits_envelope_and_records_expense() {
    let (engine, _db) = engine_with_db().await;
    let envelope_id = funded_envelope(&engine).await;

    let item = engine
        .create_wishlist_item(NewWishlistItemCmd {
            user_id: "alice".to_string(),
            description: "Bicicleta".to_string(),
            estimated_cents: 90_000,
            monthly_contribution_cents: 30_000,
            envelope_id: Some(envelope_id),
        })
        .await
        .unwrap();
    assert_eq!(item.months_to_purchase(), Some(3));

    let item = engine
        .purchase_wishlist_item(PurchaseWishlistItemCmd {
            user_id: "alice".to_string(),
            item_id: item.id,
            envelope_id: Some(envelope_id),
            actual_cents: Some(85_000),
            purchased_on: date(15),
        })
        .await
        .unwrap();
    assert_eq!(item.status, WishlistStatus::Bought);

    // Actual price won over the estimate.
    let (_, spent, available) = envelope_state(&engine, envelope_id).await;
    assert_eq!(spent, 85_000);
    assert_eq!(available, 115_000);

    let transactions = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap();
    let expense = transactions
        .iter()
        .find(|t| t.kind == TransactionKind::Expense)
        .unwrap();
    assert_eq!(expense.amount_cents, 85_000);
    assert_eq!(expense.description.as_deref(), Some("Bicicleta"));
    assert_eq!(expense.envelope_id, Some(envelope_id));
    assert_eq!(expense.occurred_on, date(15));
}

#[tokio::test]
async fn wishlist_purchase_without_envelope_touches_no_balances() {
    let (engine, _db) = engine_with_db().await;
    let envelope_id = funded_envelope(&engine).await;

    let item = engine
        .create_wishlist_item(NewWishlistItemCmd {
            user_id: "alice".to_string(),
            description: "Fone".to_string(),
            estimated_cents: 20_000,
            monthly_contribution_cents: 0,
            envelope_id: None,
        })
        .await
        .unwrap();

    engine
        .purchase_wishlist_item(PurchaseWishlistItemCmd {
            user_id: "alice".to_string(),
            item_id: item.id,
            envelope_id: None,
            actual_cents: None,
            purchased_on: date(15),
        })
        .await
        .unwrap();

    let (_, spent, _) = envelope_state(&engine, envelope_id).await;
    assert_eq!(spent, 0);

    let transactions = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap();
    assert!(transactions.is_empty());
}

#[tokio::test]
async fn buying_twice_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let envelope_id = funded_envelope(&engine).await;

    let item = engine
        .create_wishlist_item(NewWishlistItemCmd {
            user_id: "alice".to_string(),
            description: "Monitor".to_string(),
            estimated_cents: 50_000,
            monthly_contribution_cents: 0,
            envelope_id: Some(envelope_id),
        })
        .await
        .unwrap();
    engine
        .purchase_wishlist_item(PurchaseWishlistItemCmd {
            user_id: "alice".to_string(),
            item_id: item.id,
            envelope_id: Some(envelope_id),
            actual_cents: None,
            purchased_on: date(10),
        })
        .await
        .unwrap();

    let err = engine
        .purchase_wishlist_item(PurchaseWishlistItemCmd {
            user_id: "alice".to_string(),
            item_id: item.id,
            envelope_id: Some(envelope_id),
            actual_cents: None,
            purchased_on: date(11),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    // The envelope was debited exactly once.
    let (_, spent, _) = envelope_state(&engine, envelope_id).await;
    assert_eq!(spent, 50_000);
}

#[tokio::test]
async fn debt_summary_counts_by_status() {
    let (engine, _db) = engine_with_db().await;
    let envelope_id = funded_envelope(&engine).await;

    for (description, amount) in [("A", 10_000), ("B", 20_000)] {
        engine
            .create_debt(NewDebtCmd {
                user_id: "alice".to_string(),
                description: description.to_string(),
                original_cents: amount,
                monthly_interest_bps: 0,
                started_on: date(1),
                envelope_id: None,
            })
            .await
            .unwrap();
    }
    let debts = engine.list_debts("alice", None).await.unwrap();
    let first = debts.iter().find(|d| d.description == "A").unwrap();
    engine
        .amortize_debt(AmortizeDebtCmd {
            user_id: "alice".to_string(),
            debt_id: first.id,
            envelope_id,
            amount_cents: 10_000,
            paid_on: date(2),
            note: None,
        })
        .await
        .unwrap();

    let summary = engine.debt_summary("alice").await.unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.settled, 1);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.total_owed_cents, 20_000);
    assert_eq!(summary.total_original_cents, 30_000);
}

#[tokio::test]
async fn deleting_envelope_unlinks_debts_goals_and_wishlist() {
    let (engine, _db) = engine_with_db().await;
    let envelope_id = funded_envelope(&engine).await;

    let debt = engine
        .create_debt(NewDebtCmd {
            user_id: "alice".to_string(),
            description: "Linked".to_string(),
            original_cents: 10_000,
            monthly_interest_bps: 0,
            started_on: date(1),
            envelope_id: Some(envelope_id),
        })
        .await
        .unwrap();
    let goal = engine
        .create_goal(NewGoalCmd {
            user_id: "alice".to_string(),
            name: "Linked".to_string(),
            description: None,
            target_cents: 10_000,
            due_on: None,
            priority: 1,
            envelope_id: Some(envelope_id),
        })
        .await
        .unwrap();
    let item = engine
        .create_wishlist_item(NewWishlistItemCmd {
            user_id: "alice".to_string(),
            description: "Linked".to_string(),
            estimated_cents: 10_000,
            monthly_contribution_cents: 0,
            envelope_id: Some(envelope_id),
        })
        .await
        .unwrap();

    engine.delete_envelope("alice", envelope_id).await.unwrap();

    let debts = engine.list_debts("alice", None).await.unwrap();
    assert_eq!(debts.iter().find(|d| d.id == debt.id).unwrap().envelope_id, None);

    let goals = engine.list_goals("alice", None).await.unwrap();
    assert_eq!(goals.iter().find(|g| g.id == goal.id).unwrap().envelope_id, None);

    let items = engine.list_wishlist("alice").await.unwrap();
    assert_eq!(items.iter().find(|i| i.id == item.id).unwrap().envelope_id, None);
}
