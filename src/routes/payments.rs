use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::payments::{FinancialSummary, RecordPaymentRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Payment,
    response::ApiResponse,
    routes::params::FinanceQuery,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(record_payment))
        .route("/summary", get(financial_summary))
}

#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = ApiResponse<Payment>),
        (status = 400, description = "Amount must be positive"),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Appointment cancelled or already paid"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RecordPaymentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Payment>>)> {
    let res = payment_service::record_payment(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[utoipa::path(
    get,
    path = "/api/payments/summary",
    params(
        ("period" = Option<String>, Query, description = "month or year, relative to today"),
        ("from" = Option<String>, Query, description = "Start date (YYYY-MM-DD), together with `to`"),
        ("to" = Option<String>, Query, description = "End date (YYYY-MM-DD), inclusive"),
    ),
    responses(
        (status = 200, description = "Revenue summary", body = ApiResponse<FinancialSummary>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn financial_summary(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<FinanceQuery>,
) -> AppResult<Json<ApiResponse<FinancialSummary>>> {
    let res = payment_service::financial_summary(&state, &user, query).await?;
    Ok(Json(res))
}
