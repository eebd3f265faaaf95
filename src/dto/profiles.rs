use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProfileRequest {
    pub name: String,
    pub phone: Option<String>,
}
