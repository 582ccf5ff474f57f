use std::sync::Arc;

use sea_orm::{Database, DatabaseConnection};
use tempfile::TempDir;

use engine::{Currency, Engine, EngineError, Money, NewTransactionCmd, TransactionType};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// Engine over an on-disk database, so several pooled connections can write
/// at the same time.
async fn file_engine() -> (Arc<Engine>, TempDir) {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("wallet.db").display());
    let db = Database::connect(url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    (Arc::new(engine), dir)
}

async fn funded_wallet(engine: &Engine, cents: i64) -> i64 {
    let wallet = engine.new_wallet("alice", Currency::Eur).await.unwrap();
    if cents > 0 {
        engine
            .create_transaction(NewTransactionCmd::credit(
                "opening",
                wallet.id,
                Currency::Eur,
                Money::new(cents),
            ))
            .await
            .unwrap();
    }
    wallet.id
}

#[tokio::test]
async fn new_wallet_starts_empty() {
    let (engine, _db) = engine_with_db().await;

    let wallet = engine.new_wallet("  alice ", Currency::Gbp).await.unwrap();

    assert_eq!(wallet.owner, "alice");
    assert_eq!(wallet.currency, Currency::Gbp);
    assert_eq!(wallet.balance, Money::ZERO);
    assert_eq!(engine.wallet(wallet.id).await.unwrap(), wallet);
    assert!(engine.transactions_for_wallet(wallet.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_owner_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.new_wallet("   ", Currency::Eur).await.unwrap_err();

    assert_eq!(
        err,
        EngineError::Validation("owner must not be empty".to_string())
    );
}

#[tokio::test]
async fn credit_and_debit_update_balance() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = funded_wallet(&engine, 0).await;

    let (credit, wallet) = engine
        .create_transaction(
            NewTransactionCmd::credit("g-1", wallet_id, Currency::Eur, Money::new(10_000))
                .description("add money"),
        )
        .await
        .unwrap();
    assert!(credit.id > 0);
    assert_eq!(credit.transaction_type, TransactionType::Credit);
    assert_eq!(credit.description.as_deref(), Some("add money"));
    assert_eq!(wallet.balance, Money::new(10_000));
    assert_eq!(engine.wallet(wallet_id).await.unwrap(), wallet);

    let (debit, wallet) = engine
        .create_transaction(NewTransactionCmd::debit(
            "g-2",
            wallet_id,
            Currency::Eur,
            Money::new(2_550),
        ))
        .await
        .unwrap();
    assert_eq!(debit.amount, Money::new(2_550));
    assert_eq!(wallet.balance, Money::new(7_450));

    let stored = engine.wallet(wallet_id).await.unwrap();
    assert_eq!(stored.balance, Money::new(7_450));
}

#[tokio::test]
async fn debit_may_empty_the_wallet() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = funded_wallet(&engine, 500).await;

    let (_, wallet) = engine
        .create_transaction(NewTransactionCmd::debit(
            "g-1",
            wallet_id,
            Currency::Eur,
            Money::new(500),
        ))
        .await
        .unwrap();

    assert_eq!(wallet.balance, Money::ZERO);
}

#[tokio::test]
async fn debit_above_balance_changes_nothing() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = funded_wallet(&engine, 500).await;

    let err = engine
        .create_transaction(NewTransactionCmd::debit(
            "g-1",
            wallet_id,
            Currency::Eur,
            Money::new(501),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InsufficientFunds(_)));
    assert_eq!(engine.wallet(wallet_id).await.unwrap().balance, Money::new(500));
    assert_eq!(engine.transactions_for_wallet(wallet_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn global_id_is_unique_across_wallets() {
    let (engine, _db) = engine_with_db().await;
    let first = funded_wallet(&engine, 0).await;
    let second = funded_wallet(&engine, 0).await;

    engine
        .create_transaction(NewTransactionCmd::credit(
            "g-1",
            first,
            Currency::Eur,
            Money::new(100),
        ))
        .await
        .unwrap();
    let err = engine
        .create_transaction(NewTransactionCmd::credit(
            " g-1 ",
            second,
            Currency::Eur,
            Money::new(100),
        ))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::ExistingKey("g-1".to_string()));
    assert_eq!(engine.wallet(second).await.unwrap().balance, Money::ZERO);
}

#[tokio::test]
async fn currency_must_match_wallet() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = funded_wallet(&engine, 0).await;

    let err = engine
        .create_transaction(NewTransactionCmd::credit(
            "g-1",
            wallet_id,
            Currency::Usd,
            Money::new(100),
        ))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::CurrencyMismatch("wallet currency is EUR, got USD".to_string())
    );
}

#[tokio::test]
async fn invalid_commands_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let wallet_id = funded_wallet(&engine, 0).await;

    let zero = engine
        .create_transaction(NewTransactionCmd::credit(
            "g-1",
            wallet_id,
            Currency::Eur,
            Money::ZERO,
        ))
        .await
        .unwrap_err();
    assert_eq!(
        zero,
        EngineError::InvalidAmount("amount must be > 0".to_string())
    );

    let blank = engine
        .create_transaction(NewTransactionCmd::credit(
            " ",
            wallet_id,
            Currency::Eur,
            Money::new(1),
        ))
        .await
        .unwrap_err();
    assert_eq!(
        blank,
        EngineError::Validation("global_id must not be empty".to_string())
    );
}

#[tokio::test]
async fn unknown_wallet_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    assert_eq!(
        engine.transactions_for_wallet(7).await.unwrap_err(),
        EngineError::KeyNotFound("wallet 7".to_string())
    );
    assert_eq!(
        engine
            .create_transaction(NewTransactionCmd::credit(
                "g-1",
                7,
                Currency::Eur,
                Money::new(1),
            ))
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("wallet 7".to_string())
    );
}

#[tokio::test]
async fn transactions_are_listed_per_wallet_in_booking_order() {
    let (engine, _db) = engine_with_db().await;
    let first = funded_wallet(&engine, 0).await;
    let second = funded_wallet(&engine, 0).await;

    for (global_id, wallet_id) in [("a", first), ("b", second), ("c", first)] {
        engine
            .create_transaction(NewTransactionCmd::credit(
                global_id,
                wallet_id,
                Currency::Eur,
                Money::new(100),
            ))
            .await
            .unwrap();
    }

    let listed: Vec<String> = engine
        .transactions_for_wallet(first)
        .await
        .unwrap()
        .into_iter()
        .map(|tx| tx.global_id)
        .collect();
    assert_eq!(listed, vec!["a".to_string(), "c".to_string()]);

    let wallets = engine.wallets().await.unwrap();
    assert_eq!(wallets.len(), 2);
    assert_eq!(wallets[0].id, first);
    assert_eq!(wallets[0].balance, Money::new(200));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_debits_never_overdraw() {
    let (engine, _dir) = file_engine().await;
    let wallet_id = funded_wallet(&engine, 1_000).await;

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .create_transaction(NewTransactionCmd::debit(
                        format!("debit-{i}"),
                        wallet_id,
                        Currency::Eur,
                        Money::new(300),
                    ))
                    .await
            })
        })
        .collect();

    let mut booked = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok((_, wallet)) => {
                assert!(!wallet.balance.is_negative());
                booked += 1;
            }
            // SQLite may also refuse a writer whose snapshot went stale.
            Err(EngineError::InsufficientFunds(_) | EngineError::Database(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert!(booked <= 3);
    let wallet = engine.wallet(wallet_id).await.unwrap();
    assert_eq!(wallet.balance, Money::new(1_000 - 300 * booked));
    assert_eq!(
        engine.transactions_for_wallet(wallet_id).await.unwrap().len() as i64,
        1 + booked
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_with_one_global_id_book_once() {
    let (engine, _dir) = file_engine().await;
    let wallet_id = funded_wallet(&engine, 0).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .create_transaction(NewTransactionCmd::credit(
                        "shared",
                        wallet_id,
                        Currency::Eur,
                        Money::new(100),
                    ))
                    .await
            })
        })
        .collect();

    let mut booked = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => booked += 1,
            Err(EngineError::ExistingKey(key)) => assert_eq!(key, "shared"),
            Err(EngineError::Database(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(booked, 1);
    assert_eq!(engine.wallet(wallet_id).await.unwrap().balance, Money::new(100));
    assert_eq!(engine.transactions_for_wallet(wallet_id).await.unwrap().len(), 1);
}
