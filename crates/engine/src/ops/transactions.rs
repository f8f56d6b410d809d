use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Entry, MonthWindow, PaymentNotification, PaymentProvider, ResultEngine,
    Transaction, TransactionStatus, WebhookEvent, WebhookOutcome, entry, matcher, transactions,
};

use super::{Engine, with_tx};

/// Options for listing transactions.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    /// If present, only transactions in this status are returned.
    pub status: Option<TransactionStatus>,
}

impl TransactionListFilter {
    #[must_use]
    pub fn status(status: TransactionStatus) -> Self {
        Self {
            status: Some(status),
        }
    }
}

impl Engine {
    /// Stores a provider notification as a pending transaction, linked to the
    /// first member whose name matches the payer.
    ///
    /// Delivering the same payment twice stores it twice.
    pub async fn ingest_payment(
        &self,
        notification: PaymentNotification,
    ) -> ResultEngine<Transaction> {
        let duplicates = transactions::Entity::find()
            .filter(transactions::Column::ExternalId.eq(notification.external_id.clone()))
            .count(&self.database)
            .await?;
        if duplicates > 0 {
            tracing::warn!(
                external_id = %notification.external_id,
                duplicates,
                "payment already ingested, storing it again"
            );
        }

        let members = self.list_members().await?;
        let tx = matcher::ingest(notification, &members);
        transactions::ActiveModel::from(&tx)
            .insert(&self.database)
            .await?;

        match tx.member_code {
            Some(code) => tracing::info!(external_id = %tx.external_id, %code, "payment linked"),
            None => tracing::info!(
                external_id = %tx.external_id,
                payer = %tx.payer_name,
                "payment stored without member"
            ),
        }
        Ok(tx)
    }

    pub async fn transaction(&self, id: Uuid) -> ResultEngine<Transaction> {
        transactions::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("transaction {id}")))?
            .try_into()
    }

    /// Transactions matching `filter`, most recent first.
    pub async fn list_transactions(
        &self,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status.as_str()));
        }
        query
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_asc(transactions::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Confirms a transaction with an entry kind and records the entry.
    ///
    /// Confirming an already confirmed transaction records another entry.
    pub async fn confirm_transaction(&self, id: Uuid, kind: &str) -> ResultEngine<Entry> {
        let mut tx = self.transaction(id).await?;
        if tx.status == TransactionStatus::Confirmed {
            tracing::warn!(%id, "transaction already confirmed, recording another entry");
        }
        let entry = matcher::confirm(&mut tx, kind)?;

        with_tx!(self, |db_tx| {
            transactions::ActiveModel::from(&tx).update(&db_tx).await?;
            entry::ActiveModel::from(&entry).insert(&db_tx).await?;
            tracing::info!(
                %id,
                kind = %entry.kind,
                amount = %entry.amount,
                "transaction confirmed"
            );
            Ok(entry)
        })
    }

    pub async fn pending_count(&self) -> ResultEngine<u64> {
        Ok(transactions::Entity::find()
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending.as_str()))
            .count(&self.database)
            .await?)
    }

    /// Entries dated inside `window`, oldest first.
    pub async fn list_entries(&self, window: &MonthWindow) -> ResultEngine<Vec<Entry>> {
        entry::Entity::find()
            .filter(entry::Column::OccurredAt.gte(window.start))
            .filter(entry::Column::OccurredAt.lt(window.end))
            .order_by_asc(entry::Column::OccurredAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Entry::try_from)
            .collect()
    }

    /// Handles a provider webhook delivery. Payment deliveries are fetched
    /// from `provider` and ingested; anything else is ignored.
    pub async fn handle_webhook<P>(
        &self,
        event: &WebhookEvent,
        provider: &P,
    ) -> ResultEngine<WebhookOutcome>
    where
        P: PaymentProvider + Sync,
    {
        let Some(payment_id) = event.payment_id() else {
            tracing::debug!(topic = ?event.topic, "ignoring webhook");
            return Ok(WebhookOutcome::Ignored);
        };

        let notification = provider.fetch_payment(&payment_id).await?;
        let transaction = self.ingest_payment(notification).await?;
        Ok(WebhookOutcome::Ingested {
            payment_id,
            transaction: Box::new(transaction),
        })
    }
}
