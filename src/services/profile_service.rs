use sea_orm::ActiveModelTrait;
use sea_orm::ActiveValue::NotSet;
use sea_orm::Set;
use uuid::Uuid;

use crate::{
    audit::audit,
    dto::profiles::CreateProfileRequest,
    entity::profiles::ActiveModel,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CustomerProfile,
    response::ApiResponse,
    state::AppState,
    store::{BookingStore, sea_orm_store::profile_from_entity},
};

/// Each user owns at most one profile; a second attempt is a conflict.
pub async fn create_profile(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProfileRequest,
) -> AppResult<ApiResponse<CustomerProfile>> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }

    let profile = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        name: Set(name.to_string()),
        phone: Set(payload.phone.filter(|p| !p.trim().is_empty())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|e| AppError::from_store(e, "profile already exists"))?;

    audit(
        &state.pool,
        user.user_id,
        "profile_create",
        "profiles",
        serde_json::json!({ "profile_id": profile.id }),
    )
    .await;

    Ok(ApiResponse::ok("Profile created", profile_from_entity(profile)))
}

pub async fn my_profile(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CustomerProfile>> {
    let profile = state
        .booking
        .store()
        .find_profile_by_user(user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok("Profile", profile))
}
