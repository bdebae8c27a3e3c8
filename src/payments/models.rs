use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// key: payment-record -> append-only audit entry
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub customer_id: i32,
    pub amount_cents: i64,
    pub idempotency_key: Option<String>,
    pub paid_at: DateTime<Utc>,
}

/// Ephemeral payment request. Accepts the legacy JSON field names as aliases.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    #[serde(alias = "cust_id")]
    pub customer_id: i32,
    #[serde(alias = "cardNumber")]
    pub card_number: String,
    #[serde(alias = "expiryDate")]
    pub expiry_date: String,
    pub cvc: String,
    #[serde(alias = "amount", alias = "paymentAmount")]
    pub amount_cents: i64,
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Outcome of a committed (or replayed) payment.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub record: PaymentRecord,
    pub replayed: bool,
}
