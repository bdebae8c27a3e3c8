use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::error;

use crate::accounts::LookupResponse;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "phone")]
    pub phone_number: String,
    #[serde(alias = "pwd")]
    pub password: String,
}

/// Full profile returned on a successful credential check. The stored
/// password is fetched for comparison but never serialized back out.
#[derive(Debug, FromRow, Serialize)]
pub struct AccountProfile {
    pub customer_id: i32,
    pub name: String,
    pub phone_number: String,
    pub owed_balance_cents: i64,
    pub plan_id: i32,
    pub payment_method: Option<String>,
    pub email: Option<String>,
    pub plan_name: String,
    pub plan_type: String,
    pub price_cents: i64,
    pub features: Option<String>,
    pub text_limit: Option<i32>,
    pub talk_minutes: Option<i32>,
    pub text_used: i32,
    #[serde(skip_serializing)]
    pub pwd: String,
    pub total_call_minutes: i64,
    pub total_data_used: i64,
}

/// Credential check. Read-only: a login attempt never mutates state.
///
/// The password lives in the customer row and is compared verbatim; hashing
/// is owned by the account-management subsystem, not this service.
pub async fn check_account(
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LookupResponse<AccountProfile>>> {
    let profile = sqlx::query_as::<_, AccountProfile>(
        r#"
        SELECT
            c.customer_id,
            c.name,
            c.phone_number,
            c.owed_balance_cents,
            c.plan_id,
            c.payment_method,
            c.email,
            p.plan_name,
            p.plan_type,
            p.price_cents,
            p.features,
            p.text_limit,
            p.talk_minutes,
            c.text_used,
            c.pwd,
            COALESCE(SUM(cr.call_minutes), 0)::BIGINT AS total_call_minutes,
            COALESCE(SUM(cr.data_used), 0)::BIGINT AS total_data_used
        FROM customer c
        JOIN phone_plan p ON p.plan_id = c.plan_id
        LEFT JOIN call_record cr ON cr.customer_id = c.customer_id
        WHERE c.phone_number = $1
        GROUP BY
            c.customer_id, c.name, c.phone_number, c.owed_balance_cents, c.plan_id,
            c.payment_method, c.email, p.plan_name, p.plan_type, p.price_cents,
            p.features, p.text_limit, p.talk_minutes, c.pwd
        "#,
    )
    .bind(&payload.phone_number)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        error!(?e, "DB error while fetching account");
        AppError::Db(e)
    })?;

    let Some(profile) = profile else {
        return Ok(Json(LookupResponse::failure("No account found.")));
    };

    if profile.pwd != payload.password {
        return Ok(Json(LookupResponse::failure("Password incorrect.")));
    }

    Ok(Json(LookupResponse::found(profile)))
}
