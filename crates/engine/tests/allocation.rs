use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    ConfigureEnvelopesCmd, Engine, EngineError, EnvelopeTarget, Month,
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

fn month() -> Month {
    "2025-03".parse().unwrap()
}

fn targets(list: &[(&str, i32)]) -> Vec<EnvelopeTarget> {
    list.iter()
        .map(|(name, target_percent)| EnvelopeTarget {
            name: name.to_string(),
            target_percent: *target_percent,
        })
        .collect()
}

async fn configure(engine: &Engine, list: &[(&str, i32)]) {
    engine
        .configure_envelopes(ConfigureEnvelopesCmd {
            user_id: "alice".to_string(),
            month: month(),
            targets: targets(list),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn configure_creates_zeroed_envelopes_ordered_by_name() {
    let (engine, _db) = engine_with_db().await;
    configure(&engine, &[("Lazer", 15), ("Custos", 55), ("Investimentos", 30)]).await;

    let envelopes = engine.list_envelopes("alice", &month()).await.unwrap();
    let names: Vec<&str> = envelopes.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Custos", "Investimentos", "Lazer"]);
    for envelope in &envelopes {
        assert_eq!(envelope.allocated_cents, 0);
        assert_eq!(envelope.spent_cents, 0);
        assert_eq!(envelope.available_cents, 0);
    }
}

#[tokio::test]
async fn list_unconfigured_month_is_empty() {
    let (engine, _db) = engine_with_db().await;
    let envelopes = engine.list_envelopes("alice", &month()).await.unwrap();
    assert!(envelopes.is_empty());
}

#[tokio::test]
async fn allocation_splits_by_percent() {
    let (engine, _db) = engine_with_db().await;
    configure(&engine, &[("Investimentos", 30), ("Lazer", 15), ("Custos", 55)]).await;

    let envelopes = engine
        .allocate_income("alice", &month(), 100_000)
        .await
        .unwrap();

    let by_name = |name: &str| {
        envelopes
            .iter()
            .find(|e| e.name == name)
            .unwrap_or_else(|| panic!("missing envelope {name}"))
    };
    assert_eq!(by_name("Investimentos").allocated_cents, 30_000);
    assert_eq!(by_name("Lazer").allocated_cents, 15_000);
    assert_eq!(by_name("Custos").allocated_cents, 55_000);
    for envelope in &envelopes {
        assert_eq!(envelope.available_cents, envelope.allocated_cents);
        assert_eq!(envelope.spent_cents, 0);
    }
}

#[tokio::test]
async fn allocation_conserves_income_when_percents_sum_to_100() {
    let (engine, _db) = engine_with_db().await;
    configure(&engine, &[("A", 40), ("B", 35), ("C", 25)]).await;

    let before: i64 = engine
        .list_envelopes("alice", &month())
        .await
        .unwrap()
        .iter()
        .map(|e| e.allocated_cents)
        .sum();

    let envelopes = engine
        .allocate_income("alice", &month(), 123_400)
        .await
        .unwrap();
    let after: i64 = envelopes.iter().map(|e| e.allocated_cents).sum();

    assert_eq!(after - before, 123_400);
}

#[tokio::test]
async fn allocation_accumulates_over_multiple_incomes() {
    let (engine, _db) = engine_with_db().await;
    configure(&engine, &[("Custos", 100)]).await;

    engine
        .allocate_income("alice", &month(), 50_000)
        .await
        .unwrap();
    let envelopes = engine
        .allocate_income("alice", &month(), 25_000)
        .await
        .unwrap();

    assert_eq!(envelopes[0].allocated_cents, 75_000);
    assert_eq!(envelopes[0].available_cents, 75_000);
}

#[tokio::test]
async fn allocation_without_envelopes_fails() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .allocate_income("alice", &month(), 100_000)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::NoEnvelopesConfigured("2025-03".to_string())
    );
}

#[tokio::test]
async fn allocation_rejects_non_positive_amount() {
    let (engine, _db) = engine_with_db().await;
    configure(&engine, &[("Custos", 100)]).await;

    for amount in [0, -100] {
        let err = engine
            .allocate_income("alice", &month(), amount)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }
    // No writes happened.
    let envelopes = engine.list_envelopes("alice", &month()).await.unwrap();
    assert_eq!(envelopes[0].allocated_cents, 0);
}

#[tokio::test]
async fn reconfigure_updates_percent_and_keeps_balances() {
    let (engine, _db) = engine_with_db().await;
    configure(&engine, &[("Custos", 55), ("Lazer", 45)]).await;
    engine
        .allocate_income("alice", &month(), 100_000)
        .await
        .unwrap();

    // Same names, new split: balances must survive, only percents change.
    configure(&engine, &[("Custos", 70), ("Lazer", 30)]).await;

    let envelopes = engine.list_envelopes("alice", &month()).await.unwrap();
    let custos = envelopes.iter().find(|e| e.name == "Custos").unwrap();
    assert_eq!(custos.target_percent, 70);
    assert_eq!(custos.allocated_cents, 55_000);

    // No duplicate rows for the re-configured names.
    assert_eq!(envelopes.len(), 2);
}

#[tokio::test]
async fn configure_rejects_percent_out_of_range() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .configure_envelopes(ConfigureEnvelopesCmd {
            user_id: "alice".to_string(),
            month: month(),
            targets: targets(&[("Custos", 101)]),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .configure_envelopes(ConfigureEnvelopesCmd {
            user_id: "alice".to_string(),
            month: month(),
            targets: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn lax_percent_sum_is_allowed_and_used_as_stored() {
    let (engine, _db) = engine_with_db().await;
    // Sums to 80 on purpose; allocation uses stored percents as-is.
    configure(&engine, &[("Custos", 50), ("Lazer", 30)]).await;

    let envelopes = engine
        .allocate_income("alice", &month(), 100_000)
        .await
        .unwrap();
    let total: i64 = envelopes.iter().map(|e| e.allocated_cents).sum();
    assert_eq!(total, 80_000);
}

#[tokio::test]
async fn months_are_isolated() {
    let (engine, _db) = engine_with_db().await;
    configure(&engine, &[("Custos", 100)]).await;

    let other: Month = "2025-04".parse().unwrap();
    engine
        .configure_envelopes(ConfigureEnvelopesCmd {
            user_id: "alice".to_string(),
            month: other.clone(),
            targets: targets(&[("Custos", 100)]),
        })
        .await
        .unwrap();

    engine
        .allocate_income("alice", &month(), 10_000)
        .await
        .unwrap();

    let april = engine.list_envelopes("alice", &other).await.unwrap();
    assert_eq!(april[0].allocated_cents, 0);
}
