use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CustomerRef {
    #[serde(alias = "cust_id")]
    pub customer_id: i32,
}

/// Envelope shared by the read-only lookups: `data` on hit, `message` on miss.
#[derive(Debug, Serialize)]
pub struct LookupResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> LookupResponse<T> {
    pub fn found(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }

    fn not_found() -> Self {
        Self::failure("Customer not found.")
    }
}

#[derive(Debug, Serialize)]
pub struct OwedBalance {
    pub owed_balance_cents: i64,
}

pub async fn lookup_balance(
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CustomerRef>,
) -> AppResult<Json<LookupResponse<OwedBalance>>> {
    let owed: Option<i64> =
        sqlx::query_scalar("SELECT owed_balance_cents FROM customer WHERE customer_id = $1")
            .bind(payload.customer_id)
            .fetch_optional(&pool)
            .await?;

    let response = match owed {
        Some(owed_balance_cents) => LookupResponse::found(OwedBalance { owed_balance_cents }),
        None => LookupResponse::not_found(),
    };
    Ok(Json(response))
}

#[derive(Debug, FromRow, Serialize)]
pub struct UsageSummary {
    pub text_used: i32,
    pub total_call_minutes: i64,
    pub total_data_used: i64,
}

/// Aggregates usage across call records; customers with no usage rows report
/// zeroed totals.
pub async fn usage_summary(
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CustomerRef>,
) -> AppResult<Json<LookupResponse<UsageSummary>>> {
    let summary = sqlx::query_as::<_, UsageSummary>(
        r#"
        SELECT
            c.text_used,
            COALESCE(SUM(cr.call_minutes), 0)::BIGINT AS total_call_minutes,
            COALESCE(SUM(cr.data_used), 0)::BIGINT AS total_data_used
        FROM customer c
        LEFT JOIN call_record cr ON cr.customer_id = c.customer_id
        WHERE c.customer_id = $1
        GROUP BY c.customer_id, c.text_used
        "#,
    )
    .bind(payload.customer_id)
    .fetch_optional(&pool)
    .await?;

    let response = match summary {
        Some(summary) => LookupResponse::found(summary),
        None => LookupResponse::not_found(),
    };
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct BusyQuery {
    #[serde(default, alias = "cust_id")]
    pub customer_id: Option<i32>,
    #[serde(default)]
    pub number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BusyResponse {
    pub is_busy: bool,
}

/// Busy-flag check. Both identifiers must be present and the phone number
/// numeric before the store is queried.
pub async fn check_busy(
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<BusyQuery>,
) -> AppResult<Json<BusyResponse>> {
    let customer_id = payload
        .customer_id
        .ok_or_else(|| AppError::BadRequest("Invalid input data".to_string()))?;
    let number = payload
        .number
        .as_deref()
        .filter(|value| !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()))
        .ok_or_else(|| AppError::BadRequest("Invalid input data".to_string()))?;

    let busy: Option<bool> = sqlx::query_scalar(
        "SELECT busy FROM customer WHERE customer_id = $1 OR phone_number = $2",
    )
    .bind(customer_id)
    .bind(number)
    .fetch_optional(&pool)
    .await?;

    let Some(is_busy) = busy else {
        return Err(AppError::NotFound);
    };
    Ok(Json(BusyResponse { is_busy }))
}
