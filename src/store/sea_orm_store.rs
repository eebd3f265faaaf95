use chrono::{NaiveDate, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    db::OrmConn,
    entity::{
        appointments::{
            ActiveModel as AppointmentActive, Column as AppointmentCol, Entity as Appointments,
            Model as AppointmentModel,
        },
        barbers::{Entity as Barbers, Model as BarberModel},
        profiles::{Column as ProfileCol, Entity as Profiles, Model as ProfileModel},
        services::{Entity as Services, Model as ServiceModel},
    },
    error::{AppError, AppResult},
    models::{Appointment, AppointmentStatus, Barber, CustomerProfile, Service},
    slots::OccupiedInterval,
    store::{BookingStore, NewAppointment},
};

pub const SLOT_TAKEN: &str = "slot is no longer available, please pick another one";

/// PostgreSQL-backed store. The partial unique index on
/// `appointments(barber_id, appointment_date, start_time)` is what actually
/// prevents double booking.
#[derive(Clone)]
pub struct SeaOrmStore {
    conn: OrmConn,
}

impl SeaOrmStore {
    pub fn new(conn: OrmConn) -> Self {
        Self { conn }
    }
}

fn store_err(err: sea_orm::DbErr) -> AppError {
    AppError::from_store(err, SLOT_TAKEN)
}

impl BookingStore for SeaOrmStore {
    async fn find_service(&self, id: Uuid) -> AppResult<Option<Service>> {
        let model = Services::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(store_err)?;
        Ok(model.map(service_from_entity))
    }

    async fn find_barber(&self, id: Uuid) -> AppResult<Option<Barber>> {
        let model = Barbers::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(store_err)?;
        Ok(model.map(barber_from_entity))
    }

    async fn find_profile(&self, id: Uuid) -> AppResult<Option<CustomerProfile>> {
        let model = Profiles::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(store_err)?;
        Ok(model.map(profile_from_entity))
    }

    async fn find_profile_by_user(&self, user_id: Uuid) -> AppResult<Option<CustomerProfile>> {
        let model = Profiles::find()
            .filter(ProfileCol::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .map_err(store_err)?;
        Ok(model.map(profile_from_entity))
    }

    async fn find_appointment(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        Appointments::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(store_err)?
            .map(appointment_from_entity)
            .transpose()
    }

    async fn occupied_intervals(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Vec<OccupiedInterval>> {
        let rows = Appointments::find()
            .filter(AppointmentCol::BarberId.eq(barber_id))
            .filter(AppointmentCol::AppointmentDate.eq(date))
            .filter(AppointmentCol::Status.ne(AppointmentStatus::Cancelled.as_str()))
            .order_by_asc(AppointmentCol::StartTime)
            .all(&self.conn)
            .await
            .map_err(store_err)?;

        Ok(rows
            .into_iter()
            .map(|row| OccupiedInterval {
                start: row.start_time,
                end: row.end_time,
            })
            .collect())
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> AppResult<Appointment> {
        let model = AppointmentActive {
            id: Set(Uuid::new_v4()),
            customer_id: Set(appointment.customer_id),
            barber_id: Set(appointment.barber_id),
            service_id: Set(appointment.service_id),
            appointment_date: Set(appointment.date),
            start_time: Set(appointment.start_time),
            end_time: Set(appointment.end_time),
            status: Set(AppointmentStatus::Pending.as_str().to_string()),
            paid: Set(false),
            notes: Set(appointment.notes),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&self.conn)
        .await
        .map_err(store_err)?;

        appointment_from_entity(model)
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: &[AppointmentStatus],
        to: AppointmentStatus,
    ) -> AppResult<Option<Appointment>> {
        let result = Appointments::update_many()
            .col_expr(AppointmentCol::Status, Expr::value(to.as_str().to_string()))
            .col_expr(AppointmentCol::UpdatedAt, Expr::value(Utc::now()))
            .filter(AppointmentCol::Id.eq(id))
            .filter(AppointmentCol::Status.is_in(from.iter().map(AppointmentStatus::as_str)))
            .exec(&self.conn)
            .await
            .map_err(store_err)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_appointment(id).await
    }
}

pub fn service_from_entity(model: ServiceModel) -> Service {
    Service {
        id: model.id,
        name: model.name,
        price: model.price,
        duration_minutes: model.duration_minutes,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn barber_from_entity(model: BarberModel) -> Barber {
    Barber {
        id: model.id,
        name: model.name,
        photo_url: model.photo_url,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn profile_from_entity(model: ProfileModel) -> CustomerProfile {
    CustomerProfile {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        phone: model.phone,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn appointment_from_entity(model: AppointmentModel) -> AppResult<Appointment> {
    let status = model
        .status
        .parse::<AppointmentStatus>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    Ok(Appointment {
        id: model.id,
        customer_id: model.customer_id,
        barber_id: model.barber_id,
        service_id: model.service_id,
        date: model.appointment_date,
        start_time: model.start_time,
        end_time: model.end_time,
        status,
        paid: model.paid,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
