use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::gallery::{CreateGalleryImageRequest, GalleryList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::GalleryImage,
    response::ApiResponse,
    services::gallery_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_images).post(add_image))
        .route("/{id}", delete(delete_image))
}

#[utoipa::path(
    get,
    path = "/api/gallery",
    responses(
        (status = 200, description = "Gallery pictures, newest first", body = ApiResponse<GalleryList>)
    ),
    tag = "Gallery"
)]
pub async fn list_images(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<GalleryList>>> {
    let res = gallery_service::list_images(&state).await?;
    Ok(Json(res))
}

#[utoipa::path(
    post,
    path = "/api/gallery",
    request_body = CreateGalleryImageRequest,
    responses(
        (status = 201, description = "Picture added", body = ApiResponse<GalleryImage>),
        (status = 400, description = "Missing url or caption"),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Gallery"
)]
pub async fn add_image(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateGalleryImageRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<GalleryImage>>)> {
    let res = gallery_service::add_image(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[utoipa::path(
    delete,
    path = "/api/gallery/{id}",
    params(("id" = Uuid, Path, description = "Picture ID")),
    responses(
        (status = 200, description = "Picture removed", body = ApiResponse<GalleryImage>),
        (status = 404, description = "Picture not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Gallery"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<GalleryImage>>> {
    let res = gallery_service::delete_image(&state, &user, id).await?;
    Ok(Json(res))
}
