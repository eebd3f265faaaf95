use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppError, models::Service};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateServiceRequest {
    pub name: String,
    /// Price in cents.
    pub price: i64,
    pub duration_minutes: i32,
}

impl CreateServiceRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_service_fields(Some(&self.name), Some(self.price), Some(self.duration_minutes))
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub duration_minutes: Option<i32>,
    pub active: Option<bool>,
}

impl UpdateServiceRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_service_fields(self.name.as_deref(), self.price, self.duration_minutes)
    }
}

fn validate_service_fields(
    name: Option<&str>,
    price: Option<i64>,
    duration_minutes: Option<i32>,
) -> Result<(), AppError> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if price.is_some_and(|p| p < 0) {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if duration_minutes.is_some_and(|d| d <= 0) {
        return Err(AppError::BadRequest("duration must be greater than zero".into()));
    }
    Ok(())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceList {
    pub items: Vec<Service>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_duration_and_negative_price() {
        let ok = CreateServiceRequest {
            name: "Corte".into(),
            price: 4000,
            duration_minutes: 40,
        };
        assert!(ok.validate().is_ok());

        let zero = CreateServiceRequest { duration_minutes: 0, ..ok };
        assert!(zero.validate().is_err());

        let update = UpdateServiceRequest { price: Some(-1), ..Default::default() };
        assert!(update.validate().is_err());
        let blank = UpdateServiceRequest { name: Some("  ".into()), ..Default::default() };
        assert!(blank.validate().is_err());
        assert!(UpdateServiceRequest::default().validate().is_ok());
    }
}
