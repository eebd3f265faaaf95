use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims of the access tokens issued by the auth provider.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}
