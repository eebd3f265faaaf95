use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Appointment, AppointmentStatus, Barber, CustomerProfile, Service},
    slots::OccupiedInterval,
    store::{BookingStore, NewAppointment, sea_orm_store::SLOT_TAKEN},
};

#[derive(Debug, Default)]
struct Tables {
    services: HashMap<Uuid, Service>,
    barbers: HashMap<Uuid, Barber>,
    profiles: HashMap<Uuid, CustomerProfile>,
    appointments: HashMap<Uuid, Appointment>,
}

/// In-process store. Inserts enforce the same one-active-appointment-per-slot
/// rule as the database index, under the table lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    offline: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_online(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Unavailable("store is offline".into()));
        }
        Ok(())
    }

    /// While offline every call fails with a transient error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn add_service(&self, name: &str, price: i64, duration_minutes: i32) -> Service {
        let service = Service {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price,
            duration_minutes,
            active: true,
            created_at: Utc::now(),
        };
        self.tables()
            .services
            .insert(service.id, service.clone());
        service
    }

    pub fn add_barber(&self, name: &str) -> Barber {
        let barber = Barber {
            id: Uuid::new_v4(),
            name: name.to_string(),
            photo_url: None,
            active: true,
            created_at: Utc::now(),
        };
        self.tables().barbers.insert(barber.id, barber.clone());
        barber
    }

    pub fn add_profile(&self, user_id: Uuid, name: &str) -> CustomerProfile {
        let profile = CustomerProfile {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            phone: None,
            created_at: Utc::now(),
        };
        self.tables()
            .profiles
            .insert(profile.id, profile.clone());
        profile
    }

    pub fn set_service_active(&self, id: Uuid, active: bool) {
        if let Some(service) = self.tables().services.get_mut(&id) {
            service.active = active;
        }
    }

    pub fn set_barber_active(&self, id: Uuid, active: bool) {
        if let Some(barber) = self.tables().barbers.get_mut(&id) {
            barber.active = active;
        }
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        let mut appointments: Vec<Appointment> =
            self.tables().appointments.values().cloned().collect();
        appointments.sort_by_key(|a| (a.date, a.start_time, a.created_at));
        appointments
    }
}

impl BookingStore for MemoryStore {
    async fn find_service(&self, id: Uuid) -> AppResult<Option<Service>> {
        self.check_online()?;
        Ok(self.tables().services.get(&id).cloned())
    }

    async fn find_barber(&self, id: Uuid) -> AppResult<Option<Barber>> {
        self.check_online()?;
        Ok(self.tables().barbers.get(&id).cloned())
    }

    async fn find_profile(&self, id: Uuid) -> AppResult<Option<CustomerProfile>> {
        self.check_online()?;
        Ok(self.tables().profiles.get(&id).cloned())
    }

    async fn find_profile_by_user(&self, user_id: Uuid) -> AppResult<Option<CustomerProfile>> {
        self.check_online()?;
        Ok(self
            .tables()
            .profiles
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn find_appointment(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        self.check_online()?;
        Ok(self.tables().appointments.get(&id).cloned())
    }

    async fn occupied_intervals(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Vec<OccupiedInterval>> {
        self.check_online()?;
        let mut intervals: Vec<OccupiedInterval> = self
            .tables()
            .appointments
            .values()
            .filter(|a| a.barber_id == barber_id && a.date == date && a.status.is_active())
            .map(|a| OccupiedInterval {
                start: a.start_time,
                end: a.end_time,
            })
            .collect();
        intervals.sort_by_key(|i| i.start);

        // A remote read is a suspension point; keep it one so concurrent
        // bookings can interleave between the check and the insert.
        tokio::task::yield_now().await;
        Ok(intervals)
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> AppResult<Appointment> {
        self.check_online()?;
        let mut tables = self.tables();

        let taken = tables.appointments.values().any(|a| {
            a.barber_id == appointment.barber_id
                && a.date == appointment.date
                && a.start_time == appointment.start_time
                && a.status.is_active()
        });
        if taken {
            return Err(AppError::Conflict(SLOT_TAKEN.to_string()));
        }

        let created = Appointment {
            id: Uuid::new_v4(),
            customer_id: appointment.customer_id,
            barber_id: appointment.barber_id,
            service_id: appointment.service_id,
            date: appointment.date,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            status: AppointmentStatus::Pending,
            paid: false,
            notes: appointment.notes,
            created_at: Utc::now(),
        };
        tables.appointments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: &[AppointmentStatus],
        to: AppointmentStatus,
    ) -> AppResult<Option<Appointment>> {
        self.check_online()?;
        let mut tables = self.tables();
        let Some(appointment) = tables.appointments.get_mut(&id) else {
            return Ok(None);
        };
        if !from.contains(&appointment.status) {
            return Ok(None);
        }
        appointment.status = to;
        Ok(Some(appointment.clone()))
    }
}
