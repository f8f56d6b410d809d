use engine::{EngineError, PaymentNotification, PaymentProvider};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::Payment;

pub const DEFAULT_BASE_URL: &str = "https://api.mercadopago.com";

#[derive(Clone)]
pub struct MercadoPagoClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl std::fmt::Debug for MercadoPagoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MercadoPagoClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MercadoPagoError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("invalid payment id: {0:?}")]
    InvalidId(String),
    #[error("invalid payment: {0}")]
    InvalidPayment(String),
}

impl From<MercadoPagoError> for EngineError {
    fn from(err: MercadoPagoError) -> Self {
        match err {
            MercadoPagoError::InvalidId(_) | MercadoPagoError::InvalidPayment(_) => {
                EngineError::Validation(err.to_string())
            }
            MercadoPagoError::Network(_) | MercadoPagoError::Server { .. } => {
                EngineError::Collaborator(format!("mercado pago: {err}"))
            }
        }
    }
}

impl MercadoPagoClient {
    pub fn new(client: Client, base_url: String, access_token: String) -> Self {
        Self {
            client,
            base_url,
            access_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// `GET /v1/payments/{id}`
    pub async fn payment(&self, payment_id: &str) -> Result<Payment, MercadoPagoError> {
        let payment_id = payment_id.trim();
        if payment_id.is_empty()
            || !payment_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(MercadoPagoError::InvalidId(payment_id.to_string()));
        }

        tracing::debug!(payment_id, "fetching payment");
        let resp = self
            .client
            .get(self.url(&format!("/v1/payments/{payment_id}")))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<Payment>().await?);
        }

        let message = match resp.json::<ErrorBody>().await {
            Ok(err) => err.message,
            Err(_) => "server error".to_string(),
        };
        tracing::warn!(payment_id, %status, %message, "payment lookup failed");
        Err(MercadoPagoError::Server { status, message })
    }
}

impl PaymentProvider for MercadoPagoClient {
    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentNotification, EngineError> {
        let payment = self.payment(payment_id).await?;
        Ok(payment.into_notification(payment_id.trim())?)
    }
}
