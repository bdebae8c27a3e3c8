pub mod api;
pub mod models;
pub mod service;

pub use api::{process_payment, PaymentResponse};
pub use models::{PaymentReceipt, PaymentRecord, PaymentRequest};
pub use service::{PaymentError, PaymentService};
