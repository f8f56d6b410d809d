//! Payment provider seam.
//!
//! The engine never talks HTTP itself: a webhook only carries the payment
//! id, and a [`PaymentProvider`] turns that id into a full
//! [`PaymentNotification`].

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MoneyCents, ResultEngine};

/// Payment details as reported by the provider. Read-only input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentNotification {
    pub external_id: String,
    pub amount: MoneyCents,
    pub occurred_at: DateTime<Utc>,
    pub payer_first_name: String,
    pub payer_last_name: String,
    pub payer_email: Option<String>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub description: Option<String>,
}

impl PaymentNotification {
    #[must_use]
    pub fn new(
        external_id: impl Into<String>,
        amount: MoneyCents,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            amount,
            occurred_at,
            payer_first_name: String::new(),
            payer_last_name: String::new(),
            payer_email: None,
            status: None,
            payment_method: None,
            description: None,
        }
    }

    #[must_use]
    pub fn payer(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.payer_first_name = first_name.into();
        self.payer_last_name = last_name.into();
        self
    }

    #[must_use]
    pub fn payer_email(mut self, email: impl Into<String>) -> Self {
        self.payer_email = Some(email.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Given and family name joined by a single space.
    ///
    /// Either part may be empty, in which case the result keeps the
    /// separator (`"Maria "`); it is stored as is.
    #[must_use]
    pub fn payer_name(&self) -> String {
        format!("{} {}", self.payer_first_name, self.payer_last_name)
    }
}

/// Source of payment details.
pub trait PaymentProvider {
    /// Fetches the payment identified by the provider's `payment_id`.
    ///
    /// Transport or provider failures must surface as
    /// [`EngineError::Collaborator`](crate::EngineError::Collaborator);
    /// payloads missing the amount or the date as
    /// [`EngineError::Validation`](crate::EngineError::Validation).
    fn fetch_payment(
        &self,
        payment_id: &str,
    ) -> impl Future<Output = ResultEngine<PaymentNotification>> + Send;
}
