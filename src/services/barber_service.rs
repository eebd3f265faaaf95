use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::audit,
    dto::barbers::{BarberList, CreateBarberRequest, UpdateBarberRequest},
    entity::barbers::{ActiveModel, Column, Entity as Barbers},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Barber,
    response::ApiResponse,
    state::AppState,
    store::sea_orm_store::barber_from_entity,
};

const DUPLICATE_NAME: &str = "a barber with this name already exists";

fn clean_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    Ok(name.to_string())
}

pub async fn list_active(state: &AppState) -> AppResult<ApiResponse<BarberList>> {
    let items = Barbers::find()
        .filter(Column::Active.eq(true))
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(barber_from_entity)
        .collect();
    Ok(ApiResponse::ok("Barbers", BarberList { items }))
}

pub async fn list_all(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<BarberList>> {
    ensure_admin(user)?;
    let items = Barbers::find()
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(barber_from_entity)
        .collect();
    Ok(ApiResponse::ok("Barbers", BarberList { items }))
}

pub async fn get_barber(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Barber>> {
    let barber = Barbers::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(barber_from_entity)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok("Barber", barber))
}

pub async fn create_barber(
    state: &AppState,
    user: &AuthUser,
    payload: CreateBarberRequest,
) -> AppResult<ApiResponse<Barber>> {
    ensure_admin(user)?;
    let name = clean_name(&payload.name)?;

    let barber = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        photo_url: Set(payload.photo_url),
        active: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|e| AppError::from_store(e, DUPLICATE_NAME))?;

    audit(
        &state.pool,
        user.user_id,
        "barber_create",
        "barbers",
        serde_json::json!({ "barber_id": barber.id }),
    )
    .await;

    Ok(ApiResponse::ok("Barber created", barber_from_entity(barber)))
}

pub async fn update_barber(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateBarberRequest,
) -> AppResult<ApiResponse<Barber>> {
    ensure_admin(user)?;
    let existing = Barbers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(clean_name(&name)?);
    }
    if let Some(photo_url) = payload.photo_url {
        active.photo_url = Set(Some(photo_url).filter(|u| !u.trim().is_empty()));
    }
    if let Some(flag) = payload.active {
        active.active = Set(flag);
    }

    let barber = active
        .update(&state.orm)
        .await
        .map_err(|e| AppError::from_store(e, DUPLICATE_NAME))?;

    audit(
        &state.pool,
        user.user_id,
        "barber_update",
        "barbers",
        serde_json::json!({ "barber_id": barber.id }),
    )
    .await;

    Ok(ApiResponse::ok("Updated", barber_from_entity(barber)))
}

pub async fn deactivate_barber(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Barber>> {
    ensure_admin(user)?;
    let existing = Barbers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.active = Set(false);
    let barber = active.update(&state.orm).await?;

    audit(
        &state.pool,
        user.user_id,
        "barber_deactivate",
        "barbers",
        serde_json::json!({ "barber_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deactivated", barber_from_entity(barber)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(clean_name("  Rafael ").unwrap(), "Rafael");
        assert!(matches!(clean_name("   "), Err(AppError::BadRequest(_))));
    }
}
