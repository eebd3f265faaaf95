use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Payment, PaymentMethod};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordPaymentRequest {
    pub appointment_id: Uuid,
    /// Amount in cents.
    pub amount: i64,
    pub method: PaymentMethod,
}

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct MethodTotal {
    pub method: PaymentMethod,
    pub count: i64,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FinancialSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total: i64,
    pub count: i64,
    /// Mean payment in cents; zero for an empty period.
    pub average: i64,
    pub by_method: Vec<MethodTotal>,
    pub payments: Vec<Payment>,
}
