use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Engine, EngineError, MoneyCents, ObligationCmd, ObligationId, ObligationStatus,
    PaymentCmd, PaymentOutcome, Settlement,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn seed(engine: &Engine) {
    engine.ensure_owner().await.unwrap();
    engine.add_party("Alice", None).await.unwrap();
    engine.add_party("Bob", None).await.unwrap();
}

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    seed(&engine).await;
    (engine, db)
}

async fn engine_with_file_db() -> (Engine, DatabaseConnection, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    seed(&engine).await;

    (engine, db, path)
}

/// A second engine with its own connection pool on an existing ledger file.
async fn reopen(path: &std::path::Path) -> Engine {
    let url = format!("sqlite:{}?mode=rwc", path.display());
    let db = Database::connect(&url).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn count_payments(db: &DatabaseConnection) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT COUNT(*) AS n FROM payments".to_string(),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn rupees(value: i64) -> MoneyCents {
    MoneyCents::new(value * 100)
}

fn applied(outcome: PaymentOutcome) -> Settlement {
    match outcome {
        PaymentOutcome::Applied(settlement) => settlement,
        other => panic!("expected Applied, got {other:?}"),
    }
}

async fn owe(engine: &Engine, borrower: &str, lender: &str, amount: i64, on: u32) -> ObligationId {
    engine
        .create_obligation(ObligationCmd::new(borrower, lender, rupees(amount)).date(day(on)))
        .await
        .unwrap()
        .id
}

async fn status(engine: &Engine, id: ObligationId) -> ObligationStatus {
    engine.obligation(id).await.unwrap().obligation.status
}

#[tokio::test]
async fn payment_settles_oldest_obligation_first() {
    let (engine, _db) = engine_with_db().await;
    // Recorded out of date order: the date decides, not the id.
    let younger = owe(&engine, "Alice", "Bob", 30, 2).await;
    let older = owe(&engine, "Alice", "Bob", 50, 1).await;

    let settlement = applied(
        engine
            .apply_payment(PaymentCmd::new("Alice", "Bob", rupees(60)))
            .await
            .unwrap(),
    );

    assert_eq!(settlement.total_applied, rupees(60));
    assert_eq!(settlement.settled, vec![older]);
    assert_eq!(settlement.unapplied, MoneyCents::ZERO);
    assert_eq!(settlement.allocations.len(), 2);
    assert_eq!(settlement.allocations[0].obligation_id, older);
    assert_eq!(settlement.allocations[0].amount, rupees(50));
    assert_eq!(settlement.allocations[1].obligation_id, younger);
    assert_eq!(settlement.allocations[1].amount, rupees(10));
    assert_eq!(settlement.allocations[1].remaining_balance, rupees(20));

    assert_eq!(status(&engine, older).await, ObligationStatus::Settled);
    assert_eq!(status(&engine, younger).await, ObligationStatus::Active);
    assert_eq!(engine.outstanding_balance(younger).await.unwrap(), rupees(20));
}

#[tokio::test]
async fn same_day_obligations_are_ordered_by_id() {
    let (engine, _db) = engine_with_db().await;
    let first = owe(&engine, "Alice", "Bob", 10, 5).await;
    let second = owe(&engine, "Alice", "Bob", 10, 5).await;

    let settlement = applied(
        engine
            .apply_payment(PaymentCmd::new("Alice", "Bob", rupees(10)))
            .await
            .unwrap(),
    );

    assert_eq!(settlement.settled, vec![first]);
    assert_eq!(status(&engine, second).await, ObligationStatus::Active);
    // Obligations after the payment ran out get no payment row.
    assert!(engine.obligation(second).await.unwrap().payments.is_empty());
}

#[tokio::test]
async fn payment_without_active_obligations_writes_nothing() {
    let (engine, db) = engine_with_db().await;

    let outcome = engine
        .apply_payment(PaymentCmd::new("Alice", "Bob", rupees(100)))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        PaymentOutcome::NoActiveObligations {
            payer: "Alice".to_string(),
            payee: "Bob".to_string(),
            amount: rupees(100),
        }
    );
    assert_eq!(count_payments(&db).await, 0);
}

#[tokio::test]
async fn payment_only_touches_the_payer_to_payee_direction() {
    let (engine, db) = engine_with_db().await;
    let reverse = owe(&engine, "Bob", "Alice", 40, 1).await;
    let other_lender = owe(&engine, "Alice", "me", 40, 1).await;

    let outcome = engine
        .apply_payment(PaymentCmd::new("Alice", "Bob", rupees(40)))
        .await
        .unwrap();
    assert!(matches!(outcome, PaymentOutcome::NoActiveObligations { .. }));
    assert_eq!(count_payments(&db).await, 0);
    assert_eq!(status(&engine, reverse).await, ObligationStatus::Active);
    assert_eq!(status(&engine, other_lender).await, ObligationStatus::Active);
}

#[tokio::test]
async fn settled_obligations_are_not_paid_again() {
    let (engine, db) = engine_with_db().await;
    let id = owe(&engine, "me", "Alice", 25, 1).await;

    let settlement = applied(
        engine
            .apply_payment(PaymentCmd::new("myself", "alice", rupees(25)))
            .await
            .unwrap(),
    );
    assert_eq!(settlement.settled, vec![id]);
    assert_eq!(settlement.payer, "Me");
    assert_eq!(settlement.payee, "Alice");

    let outcome = engine
        .apply_payment(PaymentCmd::new("me", "Alice", rupees(5)))
        .await
        .unwrap();
    assert!(matches!(outcome, PaymentOutcome::NoActiveObligations { .. }));
    assert_eq!(count_payments(&db).await, 1);
    assert_eq!(engine.outstanding_balance(id).await.unwrap(), MoneyCents::ZERO);
}

#[tokio::test]
async fn overpayment_reports_the_unapplied_excess() {
    let (engine, db) = engine_with_db().await;
    let first = owe(&engine, "Alice", "Bob", 20, 1).await;
    let second = owe(&engine, "Alice", "Bob", 15, 2).await;

    let settlement = applied(
        engine
            .apply_payment(PaymentCmd::new("Alice", "Bob", MoneyCents::new(5_050)))
            .await
            .unwrap(),
    );

    assert_eq!(settlement.total_applied, rupees(35));
    assert_eq!(settlement.unapplied, MoneyCents::new(1_550));
    assert_eq!(settlement.settled, vec![first, second]);
    assert!(settlement.message().contains("₹15.50 exceeded"));
    // The excess is not kept as credit.
    assert_eq!(count_payments(&db).await, 2);
    let outcome = engine
        .apply_payment(PaymentCmd::new("Alice", "Bob", rupees(1)))
        .await
        .unwrap();
    assert!(matches!(outcome, PaymentOutcome::NoActiveObligations { .. }));
}

#[tokio::test]
async fn partial_payments_conserve_money() {
    let (engine, _db) = engine_with_db().await;
    let id = owe(&engine, "Bob", "me", 100, 1).await;

    for cents in [3_333, 3_333, 3_333] {
        let settlement = applied(
            engine
                .apply_payment(PaymentCmd::new("Bob", "me", MoneyCents::new(cents)))
                .await
                .unwrap(),
        );
        assert!(settlement.settled.is_empty());
    }
    assert_eq!(engine.outstanding_balance(id).await.unwrap(), MoneyCents::new(1));

    let settlement = applied(
        engine
            .apply_payment(PaymentCmd::new("Bob", "me", MoneyCents::new(1)))
            .await
            .unwrap(),
    );
    assert_eq!(settlement.settled, vec![id]);

    let detail = engine.obligation(id).await.unwrap();
    let paid: MoneyCents = detail.payments.iter().map(|p| p.amount).sum();
    assert_eq!(paid, detail.obligation.amount);
    assert_eq!(detail.outstanding, MoneyCents::ZERO);
    assert_eq!(detail.obligation.status, ObligationStatus::Settled);
    assert_eq!(detail.borrower, "Bob");
    assert_eq!(detail.lender, "Me");
}

#[tokio::test]
async fn payment_between_unknown_parties_fails() {
    let (engine, db) = engine_with_db().await;
    owe(&engine, "Alice", "Bob", 10, 1).await;

    let err = engine
        .apply_payment(PaymentCmd::new("Alice", "Carol", rupees(10)))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::PartyNotFound("Carol".to_string()));
    assert_eq!(count_payments(&db).await, 0);
}

#[tokio::test]
async fn payments_record_the_command_date_and_payer() {
    let (engine, _db) = engine_with_db().await;
    let id = owe(&engine, "Alice", "Bob", 10, 1).await;

    engine
        .apply_payment(PaymentCmd::new("Alice", "Bob", rupees(4)).date(day(9)))
        .await
        .unwrap();

    let payments = engine.obligation(id).await.unwrap().payments;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].date, day(9));
    assert_eq!(payments[0].payer_id, engine.resolve("Alice").await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_payments_never_overpay() {
    let (engine, db, path) = engine_with_file_db().await;
    let engine = Arc::new(engine);
    let id = owe(&engine, "Alice", "Bob", 50, 1).await;

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .apply_payment(PaymentCmd::new("Alice", "Bob", rupees(30)))
                    .await
            })
        })
        .collect();

    let mut total_applied = MoneyCents::ZERO;
    let mut total_unapplied = MoneyCents::ZERO;
    for handle in handles {
        let settlement = applied(handle.await.unwrap().unwrap());
        total_applied += settlement.total_applied;
        total_unapplied += settlement.unapplied;
    }

    assert_eq!(total_applied, rupees(50));
    assert_eq!(total_unapplied, rupees(10));
    assert_eq!(count_payments(&db).await, 2);
    assert_eq!(status(&engine, id).await, ObligationStatus::Settled);
    assert_eq!(engine.outstanding_balance(id).await.unwrap(), MoneyCents::ZERO);

    drop(engine);
    drop(db);
    let _ = std::fs::remove_file(path);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn payments_from_separate_engines_never_overpay() {
    let (first, db, path) = engine_with_file_db().await;
    let id = owe(&first, "Alice", "Bob", 50, 1).await;
    let second = reopen(&path).await;

    let mut handles = Vec::new();
    for engine in [first, second] {
        handles.push(tokio::spawn(async move {
            engine
                .apply_payment(PaymentCmd::new("Alice", "Bob", rupees(30)))
                .await
        }));
    }

    let mut total_applied = MoneyCents::ZERO;
    for handle in handles {
        let settlement = applied(handle.await.unwrap().unwrap());
        total_applied += settlement.total_applied;
    }
    assert_eq!(total_applied, rupees(50));

    let engine = reopen(&path).await;
    let detail = engine.obligation(id).await.unwrap();
    let paid: MoneyCents = detail.payments.iter().map(|p| p.amount).sum();
    assert_eq!(paid, rupees(50));
    assert_eq!(detail.obligation.status, ObligationStatus::Settled);
    assert_eq!(detail.outstanding, MoneyCents::ZERO);
    assert_eq!(count_payments(&db).await, 2);

    drop(engine);
    drop(db);
    let _ = std::fs::remove_file(path);
}
