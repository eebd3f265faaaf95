use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::appointments::{OpenDays, SlotList},
    error::AppResult,
    response::ApiResponse,
    routes::params::{OpenDaysQuery, SlotQuery},
    services::appointment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/days", get(open_days))
        .route("/slots", get(available_slots))
}

#[utoipa::path(
    get,
    path = "/api/schedule/days",
    params(
        ("from" = Option<String>, Query, description = "First date to consider (YYYY-MM-DD), default today"),
        ("count" = Option<usize>, Query, description = "Number of open days, default 30, max 90"),
    ),
    responses(
        (status = 200, description = "Upcoming open days", body = ApiResponse<OpenDays>)
    ),
    tag = "Schedule"
)]
pub async fn open_days(
    State(state): State<AppState>,
    Query(query): Query<OpenDaysQuery>,
) -> Json<ApiResponse<OpenDays>> {
    Json(appointment_service::open_days(&state, query))
}

#[utoipa::path(
    get,
    path = "/api/schedule/slots",
    params(
        ("barber_id" = Uuid, Query, description = "Barber ID"),
        ("date" = String, Query, description = "Date (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Free slot start times", body = ApiResponse<SlotList>),
        (status = 503, description = "Store unavailable, retry later"),
    ),
    tag = "Schedule"
)]
pub async fn available_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotQuery>,
) -> AppResult<Json<ApiResponse<SlotList>>> {
    let res = appointment_service::available_slots(&state, query).await?;
    Ok(Json(res))
}
