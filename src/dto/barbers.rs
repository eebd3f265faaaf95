use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Barber;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBarberRequest {
    pub name: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBarberRequest {
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BarberList {
    pub items: Vec<Barber>,
}
