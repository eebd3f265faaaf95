use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::barbers::{BarberList, CreateBarberRequest, UpdateBarberRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Barber,
    response::ApiResponse,
    services::barber_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_barbers).post(create_barber))
        .route("/all", get(list_all_barbers))
        .route(
            "/{id}",
            get(get_barber).put(update_barber).delete(deactivate_barber),
        )
}

#[utoipa::path(
    get,
    path = "/api/barbers",
    responses(
        (status = 200, description = "Active barbers", body = ApiResponse<BarberList>)
    ),
    tag = "Barbers"
)]
pub async fn list_barbers(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<BarberList>>> {
    let res = barber_service::list_active(&state).await?;
    Ok(Json(res))
}

#[utoipa::path(
    get,
    path = "/api/barbers/all",
    responses(
        (status = 200, description = "All barbers, including inactive", body = ApiResponse<BarberList>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Barbers"
)]
pub async fn list_all_barbers(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<BarberList>>> {
    let res = barber_service::list_all(&state, &user).await?;
    Ok(Json(res))
}

#[utoipa::path(
    get,
    path = "/api/barbers/{id}",
    params(("id" = Uuid, Path, description = "Barber ID")),
    responses(
        (status = 200, description = "Barber", body = ApiResponse<Barber>),
        (status = 404, description = "Barber not found"),
    ),
    tag = "Barbers"
)]
pub async fn get_barber(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Barber>>> {
    let res = barber_service::get_barber(&state, id).await?;
    Ok(Json(res))
}

#[utoipa::path(
    post,
    path = "/api/barbers",
    request_body = CreateBarberRequest,
    responses(
        (status = 201, description = "Barber created", body = ApiResponse<Barber>),
        (status = 409, description = "Name already used"),
    ),
    security(("bearer_auth" = [])),
    tag = "Barbers"
)]
pub async fn create_barber(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateBarberRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Barber>>)> {
    let res = barber_service::create_barber(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[utoipa::path(
    put,
    path = "/api/barbers/{id}",
    params(("id" = Uuid, Path, description = "Barber ID")),
    request_body = UpdateBarberRequest,
    responses(
        (status = 200, description = "Barber updated", body = ApiResponse<Barber>),
        (status = 404, description = "Barber not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Barbers"
)]
pub async fn update_barber(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBarberRequest>,
) -> AppResult<Json<ApiResponse<Barber>>> {
    let res = barber_service::update_barber(&state, &user, id, payload).await?;
    Ok(Json(res))
}

#[utoipa::path(
    delete,
    path = "/api/barbers/{id}",
    params(("id" = Uuid, Path, description = "Barber ID")),
    responses(
        (status = 200, description = "Barber deactivated", body = ApiResponse<Barber>),
        (status = 404, description = "Barber not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Barbers"
)]
pub async fn deactivate_barber(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Barber>>> {
    let res = barber_service::deactivate_barber(&state, &user, id).await?;
    Ok(Json(res))
}
