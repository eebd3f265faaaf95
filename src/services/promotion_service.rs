use chrono::{NaiveDate, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::audit,
    dto::promotions::{
        CouponList, CreateCouponRequest, CreatePlanRequest, PlanList, Promotions,
        UpdateCouponRequest, UpdatePlanRequest, normalize_code,
    },
    entity::{
        coupons::{
            ActiveModel as CouponActive, Column as CouponCol, Entity as Coupons,
            Model as CouponModel,
        },
        plans::{ActiveModel as PlanActive, Column as PlanCol, Entity as Plans, Model as PlanModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Coupon, Plan},
    response::ApiResponse,
    services::booking_service::today,
    state::AppState,
};

const DUPLICATE_CODE: &str = "a coupon with this code already exists";
const DUPLICATE_PLAN: &str = "a plan with this name already exists";

fn coupon_from_entity(model: CouponModel) -> Coupon {
    Coupon {
        id: model.id,
        code: model.code,
        discount_percent: model.discount_percent,
        valid_until: model.valid_until,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn plan_from_entity(model: PlanModel) -> Plan {
    Plan {
        id: model.id,
        name: model.name,
        price: model.price,
        discount_percent: model.discount_percent,
        duration_months: model.duration_months,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

/// Keeps the coupons a customer can still redeem on `date`, soonest expiry first.
pub fn redeemable(coupons: Vec<Coupon>, date: NaiveDate) -> Vec<Coupon> {
    let mut coupons: Vec<Coupon> = coupons.into_iter().filter(|c| c.is_valid_on(date)).collect();
    coupons.sort_by(|a, b| a.valid_until.cmp(&b.valid_until).then_with(|| a.code.cmp(&b.code)));
    coupons
}

/// Public promotions: active coupons that have not expired, plus active plans.
pub async fn list_promotions(state: &AppState) -> AppResult<ApiResponse<Promotions>> {
    let today = today();
    let coupons = Coupons::find()
        .filter(CouponCol::Active.eq(true))
        .filter(CouponCol::ValidUntil.gte(today))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(coupon_from_entity)
        .collect();

    let plans = Plans::find()
        .filter(PlanCol::Active.eq(true))
        .order_by_asc(PlanCol::DurationMonths)
        .order_by_asc(PlanCol::Price)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(plan_from_entity)
        .collect();

    Ok(ApiResponse::ok(
        "Promotions",
        Promotions { coupons: redeemable(coupons, today), plans },
    ))
}

pub async fn list_coupons(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CouponList>> {
    ensure_admin(user)?;
    let items = Coupons::find()
        .order_by_desc(CouponCol::ValidUntil)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(coupon_from_entity)
        .collect();
    Ok(ApiResponse::ok("Coupons", CouponList { items }))
}

pub async fn create_coupon(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCouponRequest,
) -> AppResult<ApiResponse<Coupon>> {
    ensure_admin(user)?;
    payload.validate()?;

    let coupon = CouponActive {
        id: Set(Uuid::new_v4()),
        code: Set(normalize_code(&payload.code)),
        discount_percent: Set(payload.discount_percent),
        valid_until: Set(payload.valid_until),
        active: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|e| AppError::from_store(e, DUPLICATE_CODE))?;

    audit(
        &state.pool,
        user.user_id,
        "coupon_create",
        "coupons",
        serde_json::json!({ "coupon_id": coupon.id, "code": coupon.code }),
    )
    .await;

    Ok(ApiResponse::ok("Coupon created", coupon_from_entity(coupon)))
}

pub async fn update_coupon(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCouponRequest,
) -> AppResult<ApiResponse<Coupon>> {
    ensure_admin(user)?;
    payload.validate()?;

    let existing = Coupons::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CouponActive = existing.into();
    if let Some(code) = payload.code {
        active.code = Set(normalize_code(&code));
    }
    if let Some(discount) = payload.discount_percent {
        active.discount_percent = Set(discount);
    }
    if let Some(valid_until) = payload.valid_until {
        active.valid_until = Set(valid_until);
    }
    if let Some(flag) = payload.active {
        active.active = Set(flag);
    }

    let coupon = active
        .update(&state.orm)
        .await
        .map_err(|e| AppError::from_store(e, DUPLICATE_CODE))?;

    audit(
        &state.pool,
        user.user_id,
        "coupon_update",
        "coupons",
        serde_json::json!({ "coupon_id": coupon.id }),
    )
    .await;

    Ok(ApiResponse::ok("Updated", coupon_from_entity(coupon)))
}

pub async fn deactivate_coupon(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Coupon>> {
    ensure_admin(user)?;
    let existing = Coupons::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CouponActive = existing.into();
    active.active = Set(false);
    let coupon = active.update(&state.orm).await?;

    audit(
        &state.pool,
        user.user_id,
        "coupon_deactivate",
        "coupons",
        serde_json::json!({ "coupon_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deactivated", coupon_from_entity(coupon)))
}

pub async fn list_plans(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<PlanList>> {
    ensure_admin(user)?;
    let items = Plans::find()
        .order_by_asc(PlanCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(plan_from_entity)
        .collect();
    Ok(ApiResponse::ok("Plans", PlanList { items }))
}

pub async fn create_plan(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePlanRequest,
) -> AppResult<ApiResponse<Plan>> {
    ensure_admin(user)?;
    payload.validate()?;

    let plan = PlanActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        price: Set(payload.price),
        discount_percent: Set(payload.discount_percent),
        duration_months: Set(payload.duration_months),
        active: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|e| AppError::from_store(e, DUPLICATE_PLAN))?;

    audit(
        &state.pool,
        user.user_id,
        "plan_create",
        "plans",
        serde_json::json!({ "plan_id": plan.id }),
    )
    .await;

    Ok(ApiResponse::ok("Plan created", plan_from_entity(plan)))
}

pub async fn update_plan(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePlanRequest,
) -> AppResult<ApiResponse<Plan>> {
    ensure_admin(user)?;
    payload.validate()?;

    let existing = Plans::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: PlanActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(discount) = payload.discount_percent {
        active.discount_percent = Set(discount);
    }
    if let Some(months) = payload.duration_months {
        active.duration_months = Set(months);
    }
    if let Some(flag) = payload.active {
        active.active = Set(flag);
    }

    let plan = active
        .update(&state.orm)
        .await
        .map_err(|e| AppError::from_store(e, DUPLICATE_PLAN))?;

    audit(
        &state.pool,
        user.user_id,
        "plan_update",
        "plans",
        serde_json::json!({ "plan_id": plan.id }),
    )
    .await;

    Ok(ApiResponse::ok("Updated", plan_from_entity(plan)))
}

pub async fn deactivate_plan(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Plan>> {
    ensure_admin(user)?;
    let existing = Plans::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: PlanActive = existing.into();
    active.active = Set(false);
    let plan = active.update(&state.orm).await?;

    audit(
        &state.pool,
        user.user_id,
        "plan_deactivate",
        "plans",
        serde_json::json!({ "plan_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deactivated", plan_from_entity(plan)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupon(code: &str, valid_until: NaiveDate, active: bool) -> Coupon {
        Coupon {
            id: Uuid::new_v4(),
            code: code.into(),
            discount_percent: 10,
            valid_until,
            active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn only_active_unexpired_coupons_are_listed() {
        let day = |d| NaiveDate::from_ymd_opt(2026, 10, d).unwrap();
        let listed = redeemable(
            vec![
                coupon("NOVEMBRO", day(31), true),
                coupon("ONTEM", day(18), true),
                coupon("HOJE", day(19), true),
                coupon("PAUSADO", day(25), false),
            ],
            day(19),
        );
        let codes: Vec<&str> = listed.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, ["HOJE", "NOVEMBRO"]);
    }
}
