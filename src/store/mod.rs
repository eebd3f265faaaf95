//! Persistence seam of the booking core.
//!
//! [`BookingService`](crate::services::booking_service::BookingService) only talks
//! to the store through [`BookingStore`], so the production PostgreSQL store and
//! the in-process [`MemoryStore`] are interchangeable.

use std::future::Future;

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Appointment, AppointmentStatus, Barber, CustomerProfile, Service},
    slots::OccupiedInterval,
};

pub mod memory;
pub mod sea_orm_store;

pub use memory::MemoryStore;
pub use sea_orm_store::SeaOrmStore;

/// Fields of an appointment row about to be inserted. Status starts as
/// `pending` and `paid` as false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub customer_id: Uuid,
    pub barber_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: Option<String>,
}

pub trait BookingStore: Clone + Send + Sync + 'static {
    fn find_service(&self, id: Uuid) -> impl Future<Output = AppResult<Option<Service>>> + Send;

    fn find_barber(&self, id: Uuid) -> impl Future<Output = AppResult<Option<Barber>>> + Send;

    fn find_profile(
        &self,
        id: Uuid,
    ) -> impl Future<Output = AppResult<Option<CustomerProfile>>> + Send;

    fn find_profile_by_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = AppResult<Option<CustomerProfile>>> + Send;

    fn find_appointment(
        &self,
        id: Uuid,
    ) -> impl Future<Output = AppResult<Option<Appointment>>> + Send;

    /// Intervals held by appointments of `barber_id` on `date` whose status is
    /// not `cancelled`, ordered by start time.
    fn occupied_intervals(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
    ) -> impl Future<Output = AppResult<Vec<OccupiedInterval>>> + Send;

    /// Fails with [`AppError::Conflict`](crate::error::AppError::Conflict) when a
    /// non-cancelled appointment already starts at the same barber, date and time.
    fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> impl Future<Output = AppResult<Appointment>> + Send;

    /// Sets the status of `id` to `to` only if its current status is one of
    /// `from`. Returns `None` when no row matched.
    fn transition_status(
        &self,
        id: Uuid,
        from: &[AppointmentStatus],
        to: AppointmentStatus,
    ) -> impl Future<Output = AppResult<Option<Appointment>>> + Send;
}
