use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::catalog::{CreateServiceRequest, ServiceList, UpdateServiceRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Service,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route("/all", get(list_all_services))
        .route("/{id}", put(update_service).delete(deactivate_service))
}

#[utoipa::path(
    get,
    path = "/api/services",
    responses(
        (status = 200, description = "Active services", body = ApiResponse<ServiceList>)
    ),
    tag = "Services"
)]
pub async fn list_services(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ServiceList>>> {
    let res = catalog_service::list_active(&state).await?;
    Ok(Json(res))
}

#[utoipa::path(
    get,
    path = "/api/services/all",
    responses(
        (status = 200, description = "All services, including inactive", body = ApiResponse<ServiceList>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn list_all_services(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ServiceList>>> {
    let res = catalog_service::list_all(&state, &user).await?;
    Ok(Json(res))
}

#[utoipa::path(
    post,
    path = "/api/services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = ApiResponse<Service>),
        (status = 400, description = "Invalid name, price or duration"),
        (status = 409, description = "Name already used"),
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn create_service(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateServiceRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Service>>)> {
    let res = catalog_service::create_service(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[utoipa::path(
    put,
    path = "/api/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service updated", body = ApiResponse<Service>),
        (status = 404, description = "Service not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn update_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServiceRequest>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let res = catalog_service::update_service(&state, &user, id, payload).await?;
    Ok(Json(res))
}

#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service deactivated", body = ApiResponse<Service>),
        (status = 404, description = "Service not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn deactivate_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let res = catalog_service::deactivate_service(&state, &user, id).await?;
    Ok(Json(res))
}
