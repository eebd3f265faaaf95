use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::time_format;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }

    /// Whether the appointment still holds its slot.
    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "completed" => Ok(AppointmentStatus::Completed),
            other => Err(format!("unknown appointment status {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Pix,
    DebitCard,
    CreditCard,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Pix,
        PaymentMethod::DebitCard,
        PaymentMethod::CreditCard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Pix => "pix",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::CreditCard => "credit_card",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| format!("unknown payment method {s:?}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    /// Price in cents.
    pub price: i64,
    /// Duration in minutes.
    pub duration_minutes: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Barber {
    pub id: Uuid,
    pub name: String,
    pub photo_url: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Appointment {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub barber_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    #[schema(value_type = String, example = "14:00")]
    pub start_time: NaiveTime,
    #[serde(with = "time_format")]
    #[schema(value_type = String, example = "14:30")]
    pub end_time: NaiveTime,
    pub status: AppointmentStatus,
    pub paid: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub appointment_id: Uuid,
    /// Amount in cents.
    pub amount: i64,
    pub method: PaymentMethod,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GalleryImage {
    pub id: Uuid,
    pub url: String,
    pub alt: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub discount_percent: i32,
    /// Last day the coupon can be redeemed.
    pub valid_until: NaiveDate,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.active && self.valid_until >= date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    /// Price in cents.
    pub price: i64,
    pub discount_percent: i32,
    pub duration_months: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_its_column_value() {
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<AppointmentStatus>(), Ok(status));
        }
        assert!("cancelado".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn only_cancelled_frees_the_slot() {
        assert!(AppointmentStatus::Pending.is_active());
        assert!(AppointmentStatus::Completed.is_active());
        assert!(!AppointmentStatus::Cancelled.is_active());
    }

    #[test]
    fn payment_method_parses_wire_names() {
        assert_eq!("pix".parse::<PaymentMethod>(), Ok(PaymentMethod::Pix));
        assert_eq!(
            "credit_card".parse::<PaymentMethod>(),
            Ok(PaymentMethod::CreditCard)
        );
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn appointment_times_serialize_as_hours_and_minutes() {
        let appointment = Appointment {
            id: Uuid::nil(),
            customer_id: Uuid::nil(),
            barber_id: Uuid::nil(),
            service_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            status: AppointmentStatus::Pending,
            paid: false,
            notes: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&appointment).unwrap();
        assert_eq!(json["start_time"], "14:00");
        assert_eq!(json["end_time"], "14:30");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["date"], "2026-10-20");
    }

    #[test]
    fn coupon_is_valid_through_its_last_day() {
        let day = |d| NaiveDate::from_ymd_opt(2026, 10, d).unwrap();
        let coupon = Coupon {
            id: Uuid::new_v4(),
            code: "OUTUBRO10".into(),
            discount_percent: 10,
            valid_until: day(19),
            active: true,
            created_at: Utc::now(),
        };
        assert!(coupon.is_valid_on(day(18)));
        assert!(coupon.is_valid_on(day(19)));
        assert!(!coupon.is_valid_on(day(20)));
        let paused = Coupon { active: false, ..coupon };
        assert!(!paused.is_valid_on(day(18)));
    }
}
