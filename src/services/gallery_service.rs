use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::audit,
    dto::gallery::{CreateGalleryImageRequest, GalleryList},
    entity::gallery_images::{ActiveModel, Column, Entity as GalleryImages, Model},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::GalleryImage,
    response::ApiResponse,
    state::AppState,
};

fn image_from_entity(model: Model) -> GalleryImage {
    GalleryImage {
        id: model.id,
        url: model.url,
        alt: model.alt,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

/// Public gallery, newest pictures first.
pub async fn list_images(state: &AppState) -> AppResult<ApiResponse<GalleryList>> {
    let items = GalleryImages::find()
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(image_from_entity)
        .collect();
    Ok(ApiResponse::ok("Gallery", GalleryList { items }))
}

pub async fn add_image(
    state: &AppState,
    user: &AuthUser,
    payload: CreateGalleryImageRequest,
) -> AppResult<ApiResponse<GalleryImage>> {
    ensure_admin(user)?;
    payload.validate()?;

    let image = ActiveModel {
        id: Set(Uuid::new_v4()),
        url: Set(payload.url.trim().to_string()),
        alt: Set(payload.alt.trim().to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit(
        &state.pool,
        user.user_id,
        "gallery_add",
        "gallery_images",
        serde_json::json!({ "image_id": image.id }),
    )
    .await;

    Ok(ApiResponse::ok("Image added", image_from_entity(image)))
}

pub async fn delete_image(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<GalleryImage>> {
    ensure_admin(user)?;
    let existing = GalleryImages::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    GalleryImages::delete_by_id(id).exec(&state.orm).await?;

    audit(
        &state.pool,
        user.user_id,
        "gallery_delete",
        "gallery_images",
        serde_json::json!({ "image_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Image removed", image_from_entity(existing)))
}
