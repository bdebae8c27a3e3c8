use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::models::{PaymentReceipt, PaymentRecord, PaymentRequest};

/// Failure modes of the payment protocol. Everything except `Storage` is an
/// expected outcome reported back to the caller with its message.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Customer not found.")]
    CustomerNotFound,
    #[error("Payment cannot exceed the amount owed.")]
    ExceedsOwed,
    #[error("Incorrect payment details.")]
    AuthMismatch,
    #[error("Insufficient bank balance.")]
    InsufficientFunds,
    #[error("Payment amount must be positive.")]
    InvalidAmount,
    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// key: payment-service -> two-balance settlement
#[derive(Clone)]
pub struct PaymentService {
    pool: PgPool,
}

impl PaymentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Settles one payment: debits the bank account, credits down the owed
    /// balance and appends the audit record, all inside a single transaction.
    /// Every early return drops the transaction, which rolls it back.
    pub async fn process_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentReceipt, PaymentError> {
        if request.amount_cents <= 0 {
            return Err(PaymentError::InvalidAmount);
        }

        let mut tx = self.pool.begin().await?;

        // Locks the customer row for the rest of the transaction. Concurrent
        // payments for the same customer serialize here; different customers
        // never contend.
        let owed_balance: Option<i64> = sqlx::query_scalar(
            "SELECT owed_balance_cents FROM customer WHERE customer_id = $1 FOR UPDATE",
        )
        .bind(request.customer_id)
        .fetch_optional(&mut tx)
        .await?;

        let Some(owed_balance) = owed_balance else {
            return Err(PaymentError::CustomerNotFound);
        };

        // Replay check runs after the customer lock so a duplicate submission
        // racing the original waits for it to commit instead of both inserting.
        if let Some(key) = request.idempotency_key.as_deref() {
            let prior = sqlx::query_as::<_, PaymentRecord>(
                "SELECT id, customer_id, amount_cents, idempotency_key, paid_at FROM payment WHERE idempotency_key = $1",
            )
            .bind(key)
            .fetch_optional(&mut tx)
            .await?;

            if let Some(record) = prior {
                info!(
                    customer_id = record.customer_id,
                    payment = %record.id,
                    "duplicate idempotency key, replaying original result"
                );
                return Ok(PaymentReceipt {
                    record,
                    replayed: true,
                });
            }
        }

        if request.amount_cents > owed_balance {
            return Err(PaymentError::ExceedsOwed);
        }

        // The full credential tuple is the authorization key; anything short
        // of an exact match is indistinguishable from a missing account.
        let bank_balance: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT balance_cents
            FROM cust_bank
            WHERE cust_id = $1
              AND card_num = $2
              AND ex_date = $3
              AND cvc = $4
            FOR UPDATE
            "#,
        )
        .bind(request.customer_id)
        .bind(&request.card_number)
        .bind(&request.expiry_date)
        .bind(&request.cvc)
        .fetch_optional(&mut tx)
        .await?;

        let Some(bank_balance) = bank_balance else {
            return Err(PaymentError::AuthMismatch);
        };

        if bank_balance < request.amount_cents {
            return Err(PaymentError::InsufficientFunds);
        }

        sqlx::query("UPDATE cust_bank SET balance_cents = balance_cents - $1 WHERE cust_id = $2")
            .bind(request.amount_cents)
            .bind(request.customer_id)
            .execute(&mut tx)
            .await?;

        sqlx::query(
            "UPDATE customer SET owed_balance_cents = owed_balance_cents - $1 WHERE customer_id = $2",
        )
        .bind(request.amount_cents)
        .bind(request.customer_id)
        .execute(&mut tx)
        .await?;

        let record = sqlx::query_as::<_, PaymentRecord>(
            r#"
            INSERT INTO payment (id, customer_id, amount_cents, idempotency_key, paid_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, customer_id, amount_cents, idempotency_key, paid_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.customer_id)
        .bind(request.amount_cents)
        .bind(request.idempotency_key.as_deref())
        .bind(Utc::now())
        .fetch_one(&mut tx)
        .await?;

        tx.commit().await?;

        info!(
            customer_id = record.customer_id,
            payment = %record.id,
            amount_cents = record.amount_cents,
            "payment committed"
        );

        Ok(PaymentReceipt {
            record,
            replayed: false,
        })
    }
}
