use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::audit,
    dto::catalog::{CreateServiceRequest, ServiceList, UpdateServiceRequest},
    entity::services::{ActiveModel, Column, Entity as Services},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Service,
    response::ApiResponse,
    state::AppState,
    store::sea_orm_store::service_from_entity,
};

const DUPLICATE_NAME: &str = "a service with this name already exists";

/// Public menu: active services, cheapest first.
pub async fn list_active(state: &AppState) -> AppResult<ApiResponse<ServiceList>> {
    let items = Services::find()
        .filter(Column::Active.eq(true))
        .order_by_asc(Column::Price)
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(service_from_entity)
        .collect();
    Ok(ApiResponse::ok("Services", ServiceList { items }))
}

pub async fn list_all(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<ServiceList>> {
    ensure_admin(user)?;
    let items = Services::find()
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(service_from_entity)
        .collect();
    Ok(ApiResponse::ok("Services", ServiceList { items }))
}

pub async fn create_service(
    state: &AppState,
    user: &AuthUser,
    payload: CreateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    ensure_admin(user)?;
    payload.validate()?;

    let service = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        price: Set(payload.price),
        duration_minutes: Set(payload.duration_minutes),
        active: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|e| AppError::from_store(e, DUPLICATE_NAME))?;

    audit(
        &state.pool,
        user.user_id,
        "service_create",
        "services",
        serde_json::json!({ "service_id": service.id }),
    )
    .await;

    Ok(ApiResponse::ok("Service created", service_from_entity(service)))
}

pub async fn update_service(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    ensure_admin(user)?;
    payload.validate()?;

    let existing = Services::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(duration) = payload.duration_minutes {
        active.duration_minutes = Set(duration);
    }
    if let Some(flag) = payload.active {
        active.active = Set(flag);
    }

    let service = active
        .update(&state.orm)
        .await
        .map_err(|e| AppError::from_store(e, DUPLICATE_NAME))?;

    audit(
        &state.pool,
        user.user_id,
        "service_update",
        "services",
        serde_json::json!({ "service_id": service.id }),
    )
    .await;

    Ok(ApiResponse::ok("Updated", service_from_entity(service)))
}

/// Services referenced by appointments are never deleted, only hidden from
/// new bookings.
pub async fn deactivate_service(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Service>> {
    ensure_admin(user)?;
    let existing = Services::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.active = Set(false);
    let service = active.update(&state.orm).await?;

    audit(
        &state.pool,
        user.user_id,
        "service_deactivate",
        "services",
        serde_json::json!({ "service_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deactivated", service_from_entity(service)))
}
