use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::appointments::{AppointmentList, CreateAppointmentRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Appointment,
    response::ApiResponse,
    routes::params::AppointmentListQuery,
    services::appointment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_appointment).get(list_appointments))
        .route("/mine", get(list_my_appointments))
        .route("/{id}", get(get_appointment))
        .route("/{id}/cancel", post(cancel_appointment))
        .route("/{id}/confirm", post(confirm_appointment))
        .route("/{id}/complete", post(complete_appointment))
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = ApiResponse<Appointment>),
        (status = 400, description = "Closed day, past date, off-grid time or unknown service/barber"),
        (status = 409, description = "Slot already taken"),
        (status = 503, description = "Store unavailable, retry later"),
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAppointmentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Appointment>>)> {
    let res = appointment_service::book(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "pending, confirmed, cancelled or completed"),
        ("barber_id" = Option<Uuid>, Query, description = "Barber ID"),
        ("date" = Option<String>, Query, description = "Date (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "All appointments", body = ApiResponse<AppointmentList>),
        (status = 403, description = "Staff only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AppointmentListQuery>,
) -> AppResult<Json<ApiResponse<AppointmentList>>> {
    let res = appointment_service::list_all(&state, &user, query).await?;
    Ok(Json(res))
}

#[utoipa::path(
    get,
    path = "/api/appointments/mine",
    responses(
        (status = 200, description = "Caller's appointments", body = ApiResponse<AppointmentList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn list_my_appointments(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AppointmentList>>> {
    let res = appointment_service::list_mine(&state, &user).await?;
    Ok(Json(res))
}

#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment", body = ApiResponse<Appointment>),
        (status = 404, description = "Appointment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Appointment>>> {
    let res = appointment_service::get_appointment(&state, &user, id).await?;
    Ok(Json(res))
}

#[utoipa::path(
    post,
    path = "/api/appointments/{id}/cancel",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Cancelled (also when already cancelled)", body = ApiResponse<Appointment>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Appointment already completed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Appointment>>> {
    let res = appointment_service::cancel(&state, &user, id).await?;
    Ok(Json(res))
}

#[utoipa::path(
    post,
    path = "/api/appointments/{id}/confirm",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Confirmed", body = ApiResponse<Appointment>),
        (status = 409, description = "Appointment is not pending"),
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn confirm_appointment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Appointment>>> {
    let res = appointment_service::confirm(&state, &user, id).await?;
    Ok(Json(res))
}

#[utoipa::path(
    post,
    path = "/api/appointments/{id}/complete",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Completed", body = ApiResponse<Appointment>),
        (status = 409, description = "Appointment is not confirmed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn complete_appointment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Appointment>>> {
    let res = appointment_service::complete(&state, &user, id).await?;
    Ok(Json(res))
}
