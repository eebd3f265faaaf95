use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::promotions::{
        CouponList, CreateCouponRequest, CreatePlanRequest, PlanList, Promotions,
        UpdateCouponRequest, UpdatePlanRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Coupon, Plan},
    response::ApiResponse,
    services::promotion_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_promotions))
        .route("/coupons", get(list_coupons).post(create_coupon))
        .route("/coupons/{id}", put(update_coupon).delete(deactivate_coupon))
        .route("/plans", get(list_plans).post(create_plan))
        .route("/plans/{id}", put(update_plan).delete(deactivate_plan))
}

#[utoipa::path(
    get,
    path = "/api/promotions",
    responses(
        (status = 200, description = "Redeemable coupons and active plans", body = ApiResponse<Promotions>)
    ),
    tag = "Promotions"
)]
pub async fn list_promotions(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Promotions>>> {
    let res = promotion_service::list_promotions(&state).await?;
    Ok(Json(res))
}

#[utoipa::path(
    get,
    path = "/api/promotions/coupons",
    responses(
        (status = 200, description = "All coupons, including expired", body = ApiResponse<CouponList>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Promotions"
)]
pub async fn list_coupons(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CouponList>>> {
    let res = promotion_service::list_coupons(&state, &user).await?;
    Ok(Json(res))
}

#[utoipa::path(
    post,
    path = "/api/promotions/coupons",
    request_body = CreateCouponRequest,
    responses(
        (status = 201, description = "Coupon created", body = ApiResponse<Coupon>),
        (status = 409, description = "Code already used"),
    ),
    security(("bearer_auth" = [])),
    tag = "Promotions"
)]
pub async fn create_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCouponRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Coupon>>)> {
    let res = promotion_service::create_coupon(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[utoipa::path(
    put,
    path = "/api/promotions/coupons/{id}",
    params(("id" = Uuid, Path, description = "Coupon ID")),
    request_body = UpdateCouponRequest,
    responses(
        (status = 200, description = "Coupon updated", body = ApiResponse<Coupon>),
        (status = 404, description = "Coupon not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Promotions"
)]
pub async fn update_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCouponRequest>,
) -> AppResult<Json<ApiResponse<Coupon>>> {
    let res = promotion_service::update_coupon(&state, &user, id, payload).await?;
    Ok(Json(res))
}

#[utoipa::path(
    delete,
    path = "/api/promotions/coupons/{id}",
    params(("id" = Uuid, Path, description = "Coupon ID")),
    responses(
        (status = 200, description = "Coupon deactivated", body = ApiResponse<Coupon>),
        (status = 404, description = "Coupon not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Promotions"
)]
pub async fn deactivate_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Coupon>>> {
    let res = promotion_service::deactivate_coupon(&state, &user, id).await?;
    Ok(Json(res))
}

#[utoipa::path(
    get,
    path = "/api/promotions/plans",
    responses(
        (status = 200, description = "All plans, including inactive", body = ApiResponse<PlanList>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Promotions"
)]
pub async fn list_plans(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PlanList>>> {
    let res = promotion_service::list_plans(&state, &user).await?;
    Ok(Json(res))
}

#[utoipa::path(
    post,
    path = "/api/promotions/plans",
    request_body = CreatePlanRequest,
    responses(
        (status = 201, description = "Plan created", body = ApiResponse<Plan>),
        (status = 409, description = "Name already used"),
    ),
    security(("bearer_auth" = [])),
    tag = "Promotions"
)]
pub async fn create_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePlanRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Plan>>)> {
    let res = promotion_service::create_plan(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[utoipa::path(
    put,
    path = "/api/promotions/plans/{id}",
    params(("id" = Uuid, Path, description = "Plan ID")),
    request_body = UpdatePlanRequest,
    responses(
        (status = 200, description = "Plan updated", body = ApiResponse<Plan>),
        (status = 404, description = "Plan not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Promotions"
)]
pub async fn update_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePlanRequest>,
) -> AppResult<Json<ApiResponse<Plan>>> {
    let res = promotion_service::update_plan(&state, &user, id, payload).await?;
    Ok(Json(res))
}

#[utoipa::path(
    delete,
    path = "/api/promotions/plans/{id}",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Plan deactivated", body = ApiResponse<Plan>),
        (status = 404, description = "Plan not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Promotions"
)]
pub async fn deactivate_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Plan>>> {
    let res = promotion_service::deactivate_plan(&state, &user, id).await?;
    Ok(Json(res))
}
