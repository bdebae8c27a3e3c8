use axum::{extract::Extension, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

use super::models::PaymentRequest;
use super::service::{PaymentError, PaymentService};

/// key: payment-api -> rest endpoint
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub success: bool,
    pub message: String,
}

/// Logical rejections come back as HTTP 200 with `success: false`; only a
/// storage failure surfaces as a 500.
pub async fn process_payment(
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<PaymentRequest>,
) -> AppResult<Json<PaymentResponse>> {
    let service = PaymentService::new(pool);
    match service.process_payment(payload).await {
        Ok(_) => Ok(Json(PaymentResponse {
            success: true,
            message: "Payment processed successfully".to_string(),
        })),
        Err(PaymentError::Storage(err)) => Err(AppError::Db(err)),
        Err(rejection) => Ok(Json(PaymentResponse {
            success: false,
            message: rejection.to_string(),
        })),
    }
}
