//! Payment provider webhook deliveries.
//!
//! A delivery only says *something happened* to a payment:
//!
//! ```json
//! { "type": "payment", "data": { "id": "1234567890" } }
//! ```
//!
//! The payment details are then fetched through a
//! [`PaymentProvider`](crate::PaymentProvider).

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, Transaction};

const PAYMENT_TOPIC: &str = "payment";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type", default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub data: Option<WebhookData>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub id: Option<ResourceId>,
}

/// The provider sends ids either as strings or as bare numbers.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Text(String),
    Number(u64),
}

impl WebhookEvent {
    pub fn from_slice(payload: &[u8]) -> ResultEngine<Self> {
        serde_json::from_slice(payload)
            .map_err(|err| EngineError::Validation(format!("invalid webhook payload: {err}")))
    }

    /// The payment id when this delivery is about a payment.
    #[must_use]
    pub fn payment_id(&self) -> Option<String> {
        if self.topic.as_deref() != Some(PAYMENT_TOPIC) {
            return None;
        }
        let id = match self.data.as_ref()?.id.as_ref()? {
            ResourceId::Text(text) => text.trim().to_string(),
            ResourceId::Number(number) => number.to_string(),
        };
        (!id.is_empty()).then_some(id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WebhookOutcome {
    /// Not a payment delivery, or no payment id: acknowledged and dropped.
    Ignored,
    Ingested {
        payment_id: String,
        transaction: Box<Transaction>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_id_accepts_strings_and_numbers() {
        let text = WebhookEvent::from_slice(br#"{"type":"payment","data":{"id":"987"}}"#).unwrap();
        let number = WebhookEvent::from_slice(br#"{"type":"payment","data":{"id":987}}"#).unwrap();
        assert_eq!(text.payment_id().as_deref(), Some("987"));
        assert_eq!(number.payment_id().as_deref(), Some("987"));
    }

    #[test]
    fn other_topics_and_missing_ids_are_ignored() {
        let plan = WebhookEvent::from_slice(br#"{"type":"plan","data":{"id":"1"}}"#).unwrap();
        let no_id = WebhookEvent::from_slice(br#"{"type":"payment","data":{}}"#).unwrap();
        let blank = WebhookEvent::from_slice(br#"{"type":"payment","data":{"id":"  "}}"#).unwrap();
        let empty = WebhookEvent::from_slice(b"{}").unwrap();
        assert_eq!(plan.payment_id(), None);
        assert_eq!(no_id.payment_id(), None);
        assert_eq!(blank.payment_id(), None);
        assert_eq!(empty.payment_id(), None);
    }

    #[test]
    fn malformed_payload_is_a_validation_error() {
        assert!(matches!(
            WebhookEvent::from_slice(b"not json"),
            Err(EngineError::Validation(_))
        ));
    }
}
