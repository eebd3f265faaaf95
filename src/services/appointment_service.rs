use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    audit::audit,
    dto::appointments::{AppointmentList, CreateAppointmentRequest, OpenDays, SlotList},
    entity::appointments::{Column as AppointmentCol, Entity as Appointments},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::Appointment,
    response::{ApiResponse, Meta},
    routes::params::{AppointmentListQuery, OpenDaysQuery, SlotQuery},
    services::booking_service::{BookingRequest, BookingService, today},
    state::AppState,
    store::{BookingStore, sea_orm_store::appointment_from_entity},
};

pub fn open_days(state: &AppState, query: OpenDaysQuery) -> ApiResponse<OpenDays> {
    let from = query.from.unwrap_or_else(today);
    let days = state.booking.open_days(from, query.count());
    ApiResponse::ok("Open days", OpenDays { days })
}

pub async fn available_slots(
    state: &AppState,
    query: SlotQuery,
) -> AppResult<ApiResponse<SlotList>> {
    let slots = state
        .booking
        .list_available_slots(query.barber_id, query.date)
        .await?;
    Ok(ApiResponse::ok(
        "Available slots",
        SlotList::new(query.barber_id, query.date, &slots),
    ))
}

pub async fn book(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAppointmentRequest,
) -> AppResult<ApiResponse<Appointment>> {
    let customer_id = resolve_customer(&state.booking, user, payload.customer_id).await?;

    let appointment = state
        .booking
        .create_appointment(BookingRequest {
            customer_id,
            barber_id: payload.barber_id,
            service_id: payload.service_id,
            date: payload.date,
            start_time: payload.start_time,
            notes: payload.notes.filter(|n| !n.trim().is_empty()),
        })
        .await?;

    audit(
        &state.pool,
        user.user_id,
        "appointment_create",
        "appointments",
        serde_json::json!({
            "appointment_id": appointment.id,
            "barber_id": appointment.barber_id,
            "date": appointment.date,
        }),
    )
    .await;

    Ok(ApiResponse::ok("Appointment created", appointment))
}

/// Customers always book for their own profile; staff may name any profile.
pub async fn resolve_customer<S: BookingStore>(
    booking: &BookingService<S>,
    user: &AuthUser,
    requested: Option<Uuid>,
) -> AppResult<Uuid> {
    if let Some(customer_id) = requested {
        if user.is_staff() {
            return Ok(customer_id);
        }
    }

    let profile = booking
        .store()
        .find_profile_by_user(user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("create a customer profile before booking".into())
        })?;

    match requested {
        Some(customer_id) if customer_id != profile.id => Err(AppError::Forbidden),
        _ => Ok(profile.id),
    }
}

pub async fn cancel(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Appointment>> {
    let appointment = state.booking.cancel_appointment(id, user).await?;
    audit(
        &state.pool,
        user.user_id,
        "appointment_cancel",
        "appointments",
        serde_json::json!({ "appointment_id": id, "role": user.role }),
    )
    .await;
    Ok(ApiResponse::ok("Appointment cancelled", appointment))
}

pub async fn confirm(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Appointment>> {
    let appointment = state.booking.confirm_appointment(id, user).await?;
    audit(
        &state.pool,
        user.user_id,
        "appointment_confirm",
        "appointments",
        serde_json::json!({ "appointment_id": id }),
    )
    .await;
    Ok(ApiResponse::ok("Appointment confirmed", appointment))
}

pub async fn complete(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Appointment>> {
    let appointment = state.booking.complete_appointment(id, user).await?;
    audit(
        &state.pool,
        user.user_id,
        "appointment_complete",
        "appointments",
        serde_json::json!({ "appointment_id": id }),
    )
    .await;
    Ok(ApiResponse::ok("Appointment completed", appointment))
}

pub async fn get_appointment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Appointment>> {
    let appointment = state.booking.get_appointment(id, user).await?;
    Ok(ApiResponse::ok("Appointment", appointment))
}

pub async fn list_mine(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AppointmentList>> {
    let profile = state.booking.store().find_profile_by_user(user.user_id).await?;
    let Some(profile) = profile else {
        return Ok(ApiResponse::ok("Ok", AppointmentList { items: Vec::new() }));
    };

    let items = Appointments::find()
        .filter(AppointmentCol::CustomerId.eq(profile.id))
        .order_by_desc(AppointmentCol::AppointmentDate)
        .order_by_asc(AppointmentCol::StartTime)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(appointment_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::ok("Ok", AppointmentList { items }))
}

pub async fn list_all(
    state: &AppState,
    user: &AuthUser,
    query: AppointmentListQuery,
) -> AppResult<ApiResponse<AppointmentList>> {
    ensure_staff(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let finder = Appointments::find()
        .filter(list_condition(&query))
        .order_by_desc(AppointmentCol::AppointmentDate)
        .order_by_asc(AppointmentCol::StartTime);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(u64::try_from(limit).unwrap_or_default())
        .offset(u64::try_from(offset).unwrap_or_default())
        .all(&state.orm)
        .await?
        .into_iter()
        .map(appointment_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Appointments",
        AppointmentList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

fn list_condition(query: &AppointmentListQuery) -> Condition {
    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(AppointmentCol::Status.eq(status.as_str()));
    }
    if let Some(barber_id) = query.barber_id {
        condition = condition.add(AppointmentCol::BarberId.eq(barber_id));
    }
    if let Some(date) = query.date {
        condition = condition.add(AppointmentCol::AppointmentDate.eq(date));
    }
    condition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{middleware::auth::Role, slots::ShopHours, store::MemoryStore};

    #[tokio::test]
    async fn customers_book_for_their_own_profile() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let profile = store.add_profile(user_id, "Ana");
        let booking = BookingService::new(store.clone(), ShopHours::default());
        let customer = AuthUser { user_id, role: Role::Customer };

        assert_eq!(resolve_customer(&booking, &customer, None).await.unwrap(), profile.id);
        assert_eq!(
            resolve_customer(&booking, &customer, Some(profile.id)).await.unwrap(),
            profile.id
        );
        assert!(matches!(
            resolve_customer(&booking, &customer, Some(Uuid::new_v4())).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn staff_may_book_for_anyone_and_customers_need_a_profile() {
        let store = MemoryStore::new();
        let booking = BookingService::new(store.clone(), ShopHours::default());
        let target = Uuid::new_v4();

        let staff = AuthUser { user_id: Uuid::new_v4(), role: Role::Staff };
        assert_eq!(resolve_customer(&booking, &staff, Some(target)).await.unwrap(), target);

        let newcomer = AuthUser { user_id: Uuid::new_v4(), role: Role::Customer };
        assert!(matches!(
            resolve_customer(&booking, &newcomer, None).await,
            Err(AppError::BadRequest(_))
        ));
    }
}
