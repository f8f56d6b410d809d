use chrono::{DateTime, FixedOffset, Utc};
use engine::{MoneyCents, PaymentNotification};
use serde::Deserialize;

use crate::MercadoPagoError;

/// The subset of `GET /v1/payments/{id}` the back-office keeps.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub id: serde_json::Value,
    pub transaction_amount: Option<MoneyCents>,
    pub date_created: Option<DateTime<FixedOffset>>,
    pub payer: Option<Payer>,
    pub status: Option<String>,
    pub payment_type_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Payer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl Payment {
    /// The payment id as text; the API sends it as a number.
    #[must_use]
    pub fn external_id(&self) -> Option<String> {
        match &self.id {
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// Converts to the engine's notification. `fallback_id` is used when the
    /// body carries no id of its own.
    pub fn into_notification(
        self,
        fallback_id: &str,
    ) -> Result<PaymentNotification, MercadoPagoError> {
        let external_id = self.external_id().unwrap_or_else(|| fallback_id.to_string());
        let amount = self.transaction_amount.ok_or_else(|| {
            MercadoPagoError::InvalidPayment(format!("payment {external_id} has no amount"))
        })?;
        let occurred_at = self
            .date_created
            .map(|date| date.with_timezone(&Utc))
            .ok_or_else(|| {
                MercadoPagoError::InvalidPayment(format!("payment {external_id} has no date"))
            })?;
        let payer = self.payer.unwrap_or_default();

        let mut notification = PaymentNotification::new(external_id, amount, occurred_at).payer(
            payer.first_name.unwrap_or_default(),
            payer.last_name.unwrap_or_default(),
        );
        notification.payer_email = non_blank(payer.email);
        notification.status = non_blank(self.status);
        notification.payment_method = non_blank(self.payment_type_id);
        notification.description = non_blank(self.description);
        Ok(notification)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
