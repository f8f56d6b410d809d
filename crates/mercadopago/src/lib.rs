//! Mercado Pago payments API client.
//!
//! Only the payment lookup used by webhook handling is implemented. The
//! client plugs into the engine as a [`engine::PaymentProvider`].

pub use client::{DEFAULT_BASE_URL, MercadoPagoClient, MercadoPagoError};
pub use payload::{Payer, Payment};

mod client;
mod payload;
