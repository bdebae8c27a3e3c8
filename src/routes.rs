use axum::{routing::post, Router};

use crate::{accounts, auth, payments};

pub fn api_routes() -> Router {
    Router::new()
        .route("/update-balance", post(accounts::lookup_balance))
        .route("/update-info", post(accounts::usage_summary))
        .route("/check-account", post(auth::check_account))
        .route("/checkBusy", post(accounts::check_busy))
        .route("/process-payment", post(payments::process_payment))
}
