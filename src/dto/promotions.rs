use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::{Coupon, Plan},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCouponRequest {
    pub code: String,
    pub discount_percent: i32,
    pub valid_until: NaiveDate,
}

impl CreateCouponRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_coupon_fields(Some(&self.code), Some(self.discount_percent))
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCouponRequest {
    pub code: Option<String>,
    pub discount_percent: Option<i32>,
    pub valid_until: Option<NaiveDate>,
    pub active: Option<bool>,
}

impl UpdateCouponRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_coupon_fields(self.code.as_deref(), self.discount_percent)
    }
}

fn validate_coupon_fields(code: Option<&str>, discount: Option<i32>) -> Result<(), AppError> {
    if code.is_some_and(|c| c.trim().is_empty()) {
        return Err(AppError::BadRequest("code must not be empty".into()));
    }
    if discount.is_some_and(|d| !(1..=100).contains(&d)) {
        return Err(AppError::BadRequest("discount must be between 1 and 100".into()));
    }
    Ok(())
}

/// Coupon codes are matched case-insensitively, so they are stored upper-cased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePlanRequest {
    pub name: String,
    /// Price in cents.
    pub price: i64,
    pub discount_percent: i32,
    pub duration_months: i32,
}

impl CreatePlanRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_plan_fields(
            Some(&self.name),
            Some(self.price),
            Some(self.discount_percent),
            Some(self.duration_months),
        )
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub discount_percent: Option<i32>,
    pub duration_months: Option<i32>,
    pub active: Option<bool>,
}

impl UpdatePlanRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_plan_fields(
            self.name.as_deref(),
            self.price,
            self.discount_percent,
            self.duration_months,
        )
    }
}

fn validate_plan_fields(
    name: Option<&str>,
    price: Option<i64>,
    discount: Option<i32>,
    duration_months: Option<i32>,
) -> Result<(), AppError> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if price.is_some_and(|p| p < 0) {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if discount.is_some_and(|d| !(0..=100).contains(&d)) {
        return Err(AppError::BadRequest("discount must be between 0 and 100".into()));
    }
    if duration_months.is_some_and(|m| m <= 0) {
        return Err(AppError::BadRequest("duration must be at least one month".into()));
    }
    Ok(())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CouponList {
    pub items: Vec<Coupon>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanList {
    pub items: Vec<Plan>,
}

/// What the promotions page shows: redeemable coupons and active plans.
#[derive(Debug, Serialize, ToSchema)]
pub struct Promotions {
    pub coupons: Vec<Coupon>,
    pub plans: Vec<Plan>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0 => false ; "zero off")]
    #[test_case(1 => true ; "smallest")]
    #[test_case(100 => true ; "free")]
    #[test_case(101 => false ; "more than free")]
    fn coupon_discount_range(discount_percent: i32) -> bool {
        CreateCouponRequest {
            code: "VERAO".into(),
            discount_percent,
            valid_until: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        }
        .validate()
        .is_ok()
    }

    #[test]
    fn plan_fields_are_checked() {
        let ok = CreatePlanRequest {
            name: "Mensal".into(),
            price: 9900,
            discount_percent: 15,
            duration_months: 1,
        };
        assert!(ok.validate().is_ok());
        let no_months = CreatePlanRequest { duration_months: 0, ..ok };
        assert!(no_months.validate().is_err());

        assert!(UpdatePlanRequest { price: Some(-1), ..Default::default() }.validate().is_err());
        assert!(UpdatePlanRequest { name: Some(" ".into()), ..Default::default() }.validate().is_err());
        assert!(UpdatePlanRequest::default().validate().is_ok());
        assert!(UpdateCouponRequest { code: Some("".into()), ..Default::default() }.validate().is_err());
    }

    #[test]
    fn codes_are_trimmed_and_upper_cased() {
        assert_eq!(normalize_code("  verao10 "), "VERAO10");
    }
}
