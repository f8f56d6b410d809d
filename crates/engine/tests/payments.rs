use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    Engine, EngineError, EntryKind, MoneyCents, MonthWindow, NewMember, PaymentNotification,
    PaymentProvider, TransactionListFilter, TransactionStatus, WebhookEvent, WebhookOutcome,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    (engine, db)
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

fn payment(id: &str, cents: i64, first: &str, last: &str, day: u32) -> PaymentNotification {
    PaymentNotification::new(id, MoneyCents::new(cents), at(day, 12))
        .payer(first, last)
        .status("approved")
}

/// Answers every lookup with the same payment and counts the calls.
struct FakeProvider {
    notification: PaymentNotification,
    calls: AtomicUsize,
}

impl FakeProvider {
    fn new(notification: PaymentNotification) -> Self {
        Self {
            notification,
            calls: AtomicUsize::new(0),
        }
    }
}

impl PaymentProvider for FakeProvider {
    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentNotification, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut notification = self.notification.clone();
        notification.external_id = payment_id.to_string();
        Ok(notification)
    }
}

struct FailingProvider;

impl PaymentProvider for FailingProvider {
    async fn fetch_payment(&self, _payment_id: &str) -> Result<PaymentNotification, EngineError> {
        Err(EngineError::Collaborator(
            "provider unavailable".to_string(),
        ))
    }
}

#[tokio::test]
async fn ingest_links_matching_member() {
    let (engine, _db) = engine_with_db().await;
    let member = engine
        .create_member(NewMember::new("Maria Silva"))
        .await
        .unwrap();

    let tx = engine
        .ingest_payment(payment("mp-1", 5000, "MARIA", "SILVA", 5))
        .await
        .unwrap();

    assert_eq!(tx.status, TransactionStatus::Pending);
    assert!(tx.linked);
    assert_eq!(tx.member_id, Some(member.id));
    assert_eq!(tx.member_code, Some(member.code));
    assert_eq!(tx.payer_name, "MARIA SILVA");
    assert_eq!(engine.transaction(tx.id).await.unwrap(), tx);
    assert_eq!(engine.pending_count().await.unwrap(), 1);
}

#[tokio::test]
async fn unmatched_payment_is_stored_unlinked() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_member(NewMember::new("Maria Silva"))
        .await
        .unwrap();

    let tx = engine
        .ingest_payment(payment("mp-2", 1000, "João", "Pereira", 5))
        .await
        .unwrap();

    assert!(!tx.linked);
    assert_eq!(tx.member_id, None);
    assert_eq!(tx.member_code, None);
}

#[tokio::test]
async fn duplicate_delivery_is_stored_twice() {
    let (engine, _db) = engine_with_db().await;

    engine
        .ingest_payment(payment("mp-3", 1000, "Ana", "Souza", 5))
        .await
        .unwrap();
    engine
        .ingest_payment(payment("mp-3", 1000, "Ana", "Souza", 5))
        .await
        .unwrap();

    let all = engine
        .list_transactions(&TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|tx| tx.external_id == "mp-3"));
}

#[tokio::test]
async fn confirm_books_an_entry() {
    let (engine, _db) = engine_with_db().await;
    let member = engine
        .create_member(NewMember::new("Maria Silva"))
        .await
        .unwrap();
    let tx = engine
        .ingest_payment(payment("mp-4", 5000, "Maria", "Silva", 5))
        .await
        .unwrap();

    let entry = engine.confirm_transaction(tx.id, "tithe").await.unwrap();

    assert_eq!(entry.kind, EntryKind::Tithe);
    assert_eq!(entry.amount, MoneyCents::new(5000));
    assert_eq!(entry.occurred_at, tx.occurred_at);
    assert_eq!(entry.description, "Tithe - D001");
    assert_eq!(entry.member_id, Some(member.id));
    assert_eq!(entry.transaction_id, tx.id);

    let stored = engine.transaction(tx.id).await.unwrap();
    assert_eq!(stored.status, TransactionStatus::Confirmed);
    assert_eq!(stored.kind, Some(EntryKind::Tithe));
    assert_eq!(engine.pending_count().await.unwrap(), 0);

    let march = MonthWindow::new(2024, 3).unwrap();
    assert_eq!(engine.list_entries(&march).await.unwrap(), vec![entry]);
}

#[tokio::test]
async fn confirming_twice_books_two_entries() {
    let (engine, _db) = engine_with_db().await;
    let tx = engine
        .ingest_payment(payment("mp-5", 2000, "Visitante", "", 6))
        .await
        .unwrap();

    let first = engine.confirm_transaction(tx.id, "offering").await.unwrap();
    let second = engine.confirm_transaction(tx.id, "offering").await.unwrap();

    assert_eq!(first.description, "Offering - unlinked");
    assert_ne!(first.id, second.id);
    let march = MonthWindow::new(2024, 3).unwrap();
    assert_eq!(engine.list_entries(&march).await.unwrap().len(), 2);
}

#[tokio::test]
async fn confirm_with_empty_kind_changes_nothing() {
    let (engine, _db) = engine_with_db().await;
    let tx = engine
        .ingest_payment(payment("mp-6", 2000, "Ana", "Souza", 6))
        .await
        .unwrap();

    let err = engine.confirm_transaction(tx.id, "  ").await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let stored = engine.transaction(tx.id).await.unwrap();
    assert_eq!(stored.status, TransactionStatus::Pending);
    let march = MonthWindow::new(2024, 3).unwrap();
    assert!(engine.list_entries(&march).await.unwrap().is_empty());
}

#[tokio::test]
async fn confirm_unknown_transaction_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .confirm_transaction(Uuid::new_v4(), "tithe")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn listing_filters_by_status_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let older = engine
        .ingest_payment(payment("mp-7", 1000, "Ana", "Souza", 2))
        .await
        .unwrap();
    let newer = engine
        .ingest_payment(payment("mp-8", 1000, "Ana", "Souza", 9))
        .await
        .unwrap();
    let confirmed = engine
        .ingest_payment(payment("mp-9", 1000, "Ana", "Souza", 20))
        .await
        .unwrap();
    engine
        .confirm_transaction(confirmed.id, "offering")
        .await
        .unwrap();

    let pending: Vec<Uuid> = engine
        .list_transactions(&TransactionListFilter::status(TransactionStatus::Pending))
        .await
        .unwrap()
        .iter()
        .map(|tx| tx.id)
        .collect();
    assert_eq!(pending, vec![newer.id, older.id]);

    let all = engine
        .list_transactions(&TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(all.first().map(|tx| tx.id), Some(confirmed.id));
}

#[tokio::test]
async fn payment_webhook_fetches_and_ingests() {
    let (engine, _db) = engine_with_db().await;
    let member = engine
        .create_member(NewMember::new("Maria Silva"))
        .await
        .unwrap();
    let provider = FakeProvider::new(payment("ignored", 7500, "Maria", "Silva", 10));

    let event =
        WebhookEvent::from_slice(br#"{"type":"payment","data":{"id":123456}}"#).unwrap();
    let outcome = engine.handle_webhook(&event, &provider).await.unwrap();

    let WebhookOutcome::Ingested {
        payment_id,
        transaction,
    } = outcome
    else {
        panic!("expected an ingested payment");
    };
    assert_eq!(payment_id, "123456");
    assert_eq!(transaction.external_id, "123456");
    assert_eq!(transaction.member_id, Some(member.id));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(engine.pending_count().await.unwrap(), 1);
}

#[tokio::test]
async fn other_webhooks_are_ignored() {
    let (engine, _db) = engine_with_db().await;
    let provider = FakeProvider::new(payment("x", 100, "Ana", "Souza", 1));

    for payload in [
        br#"{"type":"plan","data":{"id":"1"}}"#.as_slice(),
        br#"{"type":"payment","data":{}}"#.as_slice(),
        br#"{}"#.as_slice(),
    ] {
        let event = WebhookEvent::from_slice(payload).unwrap();
        let outcome = engine.handle_webhook(&event, &provider).await.unwrap();
        assert_eq!(outcome, WebhookOutcome::Ignored);
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    assert_eq!(engine.pending_count().await.unwrap(), 0);
}

#[tokio::test]
async fn provider_failure_is_reported() {
    let (engine, _db) = engine_with_db().await;
    let event = WebhookEvent::from_slice(br#"{"type":"payment","data":{"id":"9"}}"#).unwrap();

    let err = engine
        .handle_webhook(&event, &FailingProvider)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Collaborator(_)));
    assert_eq!(engine.pending_count().await.unwrap(), 0);
}
