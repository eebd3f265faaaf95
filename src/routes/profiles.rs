use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::profiles::CreateProfileRequest,
    error::AppResult,
    middleware::auth::AuthUser,
    models::CustomerProfile,
    response::ApiResponse,
    services::profile_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_profile))
        .route("/me", get(my_profile))
}

#[utoipa::path(
    post,
    path = "/api/profiles",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ApiResponse<CustomerProfile>),
        (status = 409, description = "Caller already has a profile"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
pub async fn create_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProfileRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CustomerProfile>>)> {
    let res = profile_service::create_profile(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[utoipa::path(
    get,
    path = "/api/profiles/me",
    responses(
        (status = 200, description = "Caller's profile", body = ApiResponse<CustomerProfile>),
        (status = 404, description = "No profile yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
pub async fn my_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CustomerProfile>>> {
    let res = profile_service::my_profile(&state, &user).await?;
    Ok(Json(res))
}
