use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dto::time_format, models::Appointment};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAppointmentRequest {
    pub barber_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    #[schema(value_type = String, example = "14:00")]
    pub start_time: NaiveTime,
    pub notes: Option<String>,
    /// Staff only: book on behalf of this customer profile.
    pub customer_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentList {
    pub items: Vec<Appointment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SlotList {
    pub barber_id: Uuid,
    pub date: NaiveDate,
    #[schema(value_type = Vec<String>, example = json!(["10:00", "10:40"]))]
    pub slots: Vec<String>,
}

impl SlotList {
    pub fn new(barber_id: Uuid, date: NaiveDate, slots: &[NaiveTime]) -> Self {
        Self {
            barber_id,
            date,
            slots: slots.iter().map(time_format::format).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OpenDays {
    pub days: Vec<NaiveDate>,
}
