//! Booking core: slot lookup, reservation and the appointment state machine.
//!
//! The availability check and the insert are two separate store calls with no
//! lock held in between. Two requests may both see a slot as free; the store's
//! uniqueness rule on (barber, date, start time) decides which insert wins and
//! the loser gets [`AppError::Conflict`].

use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{Appointment, AppointmentStatus},
    slots::{ShopHours, compute_end_time, filter_available},
    store::{BookingStore, NewAppointment},
};

/// A reservation request after the caller's identity has been resolved to a
/// customer profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub customer_id: Uuid,
    pub barber_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub notes: Option<String>,
}

/// The shop's local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Clone)]
pub struct BookingService<S> {
    store: S,
    hours: ShopHours,
}

impl<S: BookingStore> BookingService<S> {
    pub fn new(store: S, hours: ShopHours) -> Self {
        Self { store, hours }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open, not in the past.
    pub fn is_bookable_date(&self, date: NaiveDate) -> bool {
        date >= today() && self.hours.is_open_day(date)
    }

    pub fn open_days(&self, from: NaiveDate, count: usize) -> Vec<NaiveDate> {
        self.hours.upcoming_open_days(from.max(today()), count)
    }

    /// Free slot start times of `barber_id` on `date`, in grid order. Closed
    /// and past dates have no slots.
    pub async fn list_available_slots(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Vec<NaiveTime>> {
        if !self.is_bookable_date(date) {
            return Ok(Vec::new());
        }
        let occupied = self.store.occupied_intervals(barber_id, date).await?;
        Ok(filter_available(&self.hours.daily_slots(), &occupied))
    }

    pub async fn create_appointment(&self, request: BookingRequest) -> AppResult<Appointment> {
        if request.date < today() {
            return Err(AppError::BadRequest("date is in the past".into()));
        }
        if !self.hours.is_open_day(request.date) {
            return Err(AppError::BadRequest(format!(
                "the shop is closed on {}",
                request.date.weekday()
            )));
        }
        if !self.hours.daily_slots().contains(&request.start_time) {
            return Err(AppError::BadRequest(format!(
                "{} is not a bookable slot",
                request.start_time.format("%H:%M")
            )));
        }

        let service = self
            .store
            .find_service(request.service_id)
            .await?
            .filter(|s| s.active)
            .ok_or_else(|| AppError::BadRequest("service not found or inactive".into()))?;
        if service.duration_minutes <= 0 {
            return Err(AppError::BadRequest("service has no valid duration".into()));
        }
        self.store
            .find_barber(request.barber_id)
            .await?
            .filter(|b| b.active)
            .ok_or_else(|| AppError::BadRequest("barber not found or inactive".into()))?;
        self.store
            .find_profile(request.customer_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("customer profile not found".into()))?;

        let available = self
            .list_available_slots(request.barber_id, request.date)
            .await?;
        if !available.contains(&request.start_time) {
            tracing::info!(
                barber_id = %request.barber_id,
                date = %request.date,
                start_time = %request.start_time,
                "requested slot already taken"
            );
            return Err(AppError::Conflict(
                "slot is no longer available, please pick another one".into(),
            ));
        }

        let end_time = compute_end_time(request.start_time, service.duration_minutes as u32);
        let result = self
            .store
            .insert_appointment(NewAppointment {
                customer_id: request.customer_id,
                barber_id: request.barber_id,
                service_id: request.service_id,
                date: request.date,
                start_time: request.start_time,
                end_time,
                notes: request.notes,
            })
            .await;

        match &result {
            Ok(appointment) => tracing::info!(
                appointment_id = %appointment.id,
                barber_id = %appointment.barber_id,
                date = %appointment.date,
                start_time = %appointment.start_time,
                end_time = %appointment.end_time,
                "appointment created"
            ),
            Err(AppError::Conflict(_)) => tracing::warn!(
                barber_id = %request.barber_id,
                date = %request.date,
                start_time = %request.start_time,
                "lost booking race for slot"
            ),
            Err(_) => {}
        }
        result
    }

    /// Owners and staff may cancel. Cancelling twice succeeds without changes;
    /// completed appointments cannot be cancelled.
    pub async fn cancel_appointment(&self, id: Uuid, actor: &AuthUser) -> AppResult<Appointment> {
        let appointment = self.load(id).await?;
        self.authorize_owner_or_staff(&appointment, actor).await?;

        match appointment.status {
            AppointmentStatus::Cancelled => return Ok(appointment),
            AppointmentStatus::Completed => {
                return Err(AppError::Conflict(
                    "completed appointments cannot be cancelled".into(),
                ));
            }
            AppointmentStatus::Pending | AppointmentStatus::Confirmed => {}
        }

        let cancelled = self
            .advance(
                id,
                &[AppointmentStatus::Pending, AppointmentStatus::Confirmed],
                AppointmentStatus::Cancelled,
            )
            .await?;
        tracing::info!(
            appointment_id = %cancelled.id,
            barber_id = %cancelled.barber_id,
            date = %cancelled.date,
            start_time = %cancelled.start_time,
            actor = %actor.user_id,
            "appointment cancelled"
        );
        Ok(cancelled)
    }

    /// pending -> confirmed, staff only.
    pub async fn confirm_appointment(&self, id: Uuid, actor: &AuthUser) -> AppResult<Appointment> {
        ensure_staff(actor)?;
        let appointment = self.load(id).await?;
        match appointment.status {
            AppointmentStatus::Confirmed => Ok(appointment),
            AppointmentStatus::Pending => {
                self.advance(id, &[AppointmentStatus::Pending], AppointmentStatus::Confirmed)
                    .await
            }
            other => Err(AppError::Conflict(format!(
                "cannot confirm a {other} appointment"
            ))),
        }
    }

    /// confirmed -> completed, staff only.
    pub async fn complete_appointment(
        &self,
        id: Uuid,
        actor: &AuthUser,
    ) -> AppResult<Appointment> {
        ensure_staff(actor)?;
        let appointment = self.load(id).await?;
        match appointment.status {
            AppointmentStatus::Completed => Ok(appointment),
            AppointmentStatus::Confirmed => {
                self.advance(id, &[AppointmentStatus::Confirmed], AppointmentStatus::Completed)
                    .await
            }
            other => Err(AppError::Conflict(format!(
                "cannot complete a {other} appointment"
            ))),
        }
    }

    /// Owners and staff may read an appointment.
    pub async fn get_appointment(&self, id: Uuid, actor: &AuthUser) -> AppResult<Appointment> {
        let appointment = self.load(id).await?;
        self.authorize_owner_or_staff(&appointment, actor).await?;
        Ok(appointment)
    }

    async fn load(&self, id: Uuid) -> AppResult<Appointment> {
        self.store
            .find_appointment(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn authorize_owner_or_staff(
        &self,
        appointment: &Appointment,
        actor: &AuthUser,
    ) -> AppResult<()> {
        if actor.is_staff() {
            return Ok(());
        }
        let profile = self.store.find_profile_by_user(actor.user_id).await?;
        match profile {
            Some(profile) if profile.id == appointment.customer_id => Ok(()),
            _ => Err(AppError::Forbidden),
        }
    }

    /// Conditional status write. When another request moved the appointment
    /// first, succeeds only if it already reached `to`.
    async fn advance(
        &self,
        id: Uuid,
        from: &[AppointmentStatus],
        to: AppointmentStatus,
    ) -> AppResult<Appointment> {
        if let Some(updated) = self.store.transition_status(id, from, to).await? {
            return Ok(updated);
        }
        let current = self.load(id).await?;
        if current.status == to {
            return Ok(current);
        }
        Err(AppError::Conflict(format!(
            "appointment is {} and cannot become {to}",
            current.status
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{middleware::auth::Role, models::Service, store::MemoryStore};
    use chrono::{Days, Weekday};

    struct Fixture {
        booking: BookingService<MemoryStore>,
        store: MemoryStore,
        service: Service,
        barber_id: Uuid,
        customer: AuthUser,
        customer_id: Uuid,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let service = store.add_service("Combo Corte + Barba", 6000, 30);
        let barber = store.add_barber("Carlos");
        let user_id = Uuid::new_v4();
        let profile = store.add_profile(user_id, "Ana");
        Fixture {
            booking: BookingService::new(store.clone(), ShopHours::default()),
            store,
            service,
            barber_id: barber.id,
            customer: AuthUser { user_id, role: Role::Customer },
            customer_id: profile.id,
        }
    }

    fn next(weekday: Weekday) -> NaiveDate {
        let mut date = Local::now().date_naive() + Days::new(1);
        while date.weekday() != weekday {
            date = date + Days::new(1);
        }
        date
    }

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn request(f: &Fixture, date: NaiveDate, start: NaiveTime) -> BookingRequest {
        BookingRequest {
            customer_id: f.customer_id,
            barber_id: f.barber_id,
            service_id: f.service.id,
            date,
            start_time: start,
            notes: None,
        }
    }

    fn staff() -> AuthUser {
        AuthUser { user_id: Uuid::new_v4(), role: Role::Staff }
    }

    #[tokio::test]
    async fn end_time_follows_service_duration() {
        let f = fixture();
        let created = f
            .booking
            .create_appointment(request(&f, next(Weekday::Tue), t(14, 0)))
            .await
            .unwrap();
        assert_eq!(created.end_time, t(14, 30));
        assert_eq!(created.status, AppointmentStatus::Pending);
        assert!(!created.paid);
    }

    #[tokio::test]
    async fn sunday_has_no_slots_and_cannot_be_booked() {
        let f = fixture();
        let sunday = next(Weekday::Sun);
        assert!(f
            .booking
            .list_available_slots(f.barber_id, sunday)
            .await
            .unwrap()
            .is_empty());
        let err = f
            .booking
            .create_appointment(request(&f, sunday, t(10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn past_dates_are_rejected() {
        let f = fixture();
        let yesterday = Local::now().date_naive() - Days::new(1);
        let err = f
            .booking
            .create_appointment(request(&f, yesterday, t(10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn off_grid_start_is_a_validation_error() {
        let f = fixture();
        let err = f
            .booking
            .create_appointment(request(&f, next(Weekday::Wed), t(10, 15)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn inactive_barber_or_service_is_rejected() {
        let f = fixture();
        let date = next(Weekday::Thu);

        f.store.set_barber_active(f.barber_id, false);
        let err = f
            .booking
            .create_appointment(request(&f, date, t(10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        f.store.set_barber_active(f.barber_id, true);
        f.store.set_service_active(f.service.id, false);
        let err = f
            .booking
            .create_appointment(request(&f, date, t(10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(f.store.appointments().is_empty());
    }

    #[tokio::test]
    async fn taken_slot_is_a_conflict() {
        let f = fixture();
        let date = next(Weekday::Fri);
        f.booking
            .create_appointment(request(&f, date, t(10, 40)))
            .await
            .unwrap();
        let err = f
            .booking
            .create_appointment(request(&f, date, t(10, 40)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn store_outage_is_retryable() {
        let f = fixture();
        f.store.set_offline(true);
        let err = f
            .booking
            .list_available_slots(f.barber_id, next(Weekday::Mon))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn cancel_is_idempotent_and_isolated() {
        let f = fixture();
        let date = next(Weekday::Tue);
        let mine = f
            .booking
            .create_appointment(request(&f, date, t(10, 0)))
            .await
            .unwrap();
        let other = f
            .booking
            .create_appointment(request(&f, date, t(11, 20)))
            .await
            .unwrap();

        let first = f.booking.cancel_appointment(mine.id, &f.customer).await.unwrap();
        let second = f.booking.cancel_appointment(mine.id, &f.customer).await.unwrap();
        assert_eq!(first.status, AppointmentStatus::Cancelled);
        assert_eq!(second.status, AppointmentStatus::Cancelled);

        let untouched = f.booking.get_appointment(other.id, &f.customer).await.unwrap();
        assert_eq!(untouched.status, AppointmentStatus::Pending);
    }

    #[tokio::test]
    async fn strangers_cannot_cancel() {
        let f = fixture();
        let created = f
            .booking
            .create_appointment(request(&f, next(Weekday::Sat), t(12, 0)))
            .await
            .unwrap();

        let stranger_id = Uuid::new_v4();
        f.store.add_profile(stranger_id, "Bruno");
        let stranger = AuthUser { user_id: stranger_id, role: Role::Customer };
        let err = f
            .booking
            .cancel_appointment(created.id, &stranger)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        let without_profile = AuthUser { user_id: Uuid::new_v4(), role: Role::Customer };
        assert!(matches!(
            f.booking.cancel_appointment(created.id, &without_profile).await,
            Err(AppError::Forbidden)
        ));

        let cancelled = f.booking.cancel_appointment(created.id, &staff()).await.unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    }

    #[tokio::test]
    async fn status_machine_runs_pending_confirmed_completed() {
        let f = fixture();
        let created = f
            .booking
            .create_appointment(request(&f, next(Weekday::Mon), t(16, 0)))
            .await
            .unwrap();
        let staff = staff();

        assert!(matches!(
            f.booking.complete_appointment(created.id, &staff).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            f.booking.confirm_appointment(created.id, &f.customer).await,
            Err(AppError::Forbidden)
        ));

        let confirmed = f.booking.confirm_appointment(created.id, &staff).await.unwrap();
        assert_eq!(confirmed.status, AppointmentStatus::Confirmed);
        let completed = f.booking.complete_appointment(created.id, &staff).await.unwrap();
        assert_eq!(completed.status, AppointmentStatus::Completed);

        assert!(matches!(
            f.booking.cancel_appointment(created.id, &f.customer).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            f.booking.confirm_appointment(created.id, &staff).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn cancelled_appointments_cannot_be_revived() {
        let f = fixture();
        let created = f
            .booking
            .create_appointment(request(&f, next(Weekday::Wed), t(13, 20)))
            .await
            .unwrap();
        f.booking.cancel_appointment(created.id, &f.customer).await.unwrap();
        assert!(matches!(
            f.booking.confirm_appointment(created.id, &staff()).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn missing_appointment_is_not_found() {
        let f = fixture();
        assert!(matches!(
            f.booking.cancel_appointment(Uuid::new_v4(), &staff()).await,
            Err(AppError::NotFound)
        ));
    }

    #[test]
    fn open_days_never_include_sunday_or_the_past() {
        let f = fixture();
        let last_week = Local::now().date_naive() - Days::new(7);
        let days = f.booking.open_days(last_week, 14);
        assert_eq!(days.len(), 14);
        assert!(days.iter().all(|d| d.weekday() != Weekday::Sun));
        assert!(days.iter().all(|d| *d >= Local::now().date_naive()));
    }
}
