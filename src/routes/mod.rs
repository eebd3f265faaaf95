use axum::Router;

use crate::state::AppState;

pub mod appointments;
pub mod barbers;
pub mod catalog;
pub mod doc;
pub mod gallery;
pub mod health;
pub mod params;
pub mod payments;
pub mod profiles;
pub mod promotions;
pub mod schedule;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/services", catalog::router())
        .nest("/barbers", barbers::router())
        .nest("/schedule", schedule::router())
        .nest("/appointments", appointments::router())
        .nest("/profiles", profiles::router())
        .nest("/payments", payments::router())
        .nest("/gallery", gallery::router())
        .nest("/promotions", promotions::router())
}
