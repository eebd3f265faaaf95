use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::AppointmentStatus;

#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

const MAX_PAGE: i64 = 1_000_000;

impl Pagination {
    /// Returns `(page, per_page, offset)`; the offset is never negative.
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

// Kept flat: serde_urlencoded cannot parse numbers inside `#[serde(flatten)]`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AppointmentListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<AppointmentStatus>,
    pub barber_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

impl AppointmentListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SlotQuery {
    pub barber_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OpenDaysQuery {
    pub from: Option<NaiveDate>,
    pub count: Option<usize>,
}

impl OpenDaysQuery {
    pub fn count(&self) -> usize {
        self.count.unwrap_or(30).clamp(1, 90)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Month,
    Year,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FinanceQuery {
    pub period: Option<Period>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_is_clamped() {
        let p = Pagination { page: Some(0), per_page: Some(500) };
        assert_eq!(p.normalize(), (1, 100, 0));
        let p = Pagination { page: Some(3), per_page: None };
        assert_eq!(p.normalize(), (3, 20, 40));
    }

    #[test]
    fn huge_pages_do_not_overflow() {
        let q = AppointmentListQuery {
            page: Some(i64::MAX),
            per_page: Some(i64::MAX),
            ..Default::default()
        };
        let (page, per_page, offset) = q.pagination().normalize();
        assert_eq!((page, per_page), (MAX_PAGE, 100));
        assert_eq!(offset, (MAX_PAGE - 1) * 100);

        let q = AppointmentListQuery { page: Some(i64::MIN), ..Default::default() };
        assert_eq!(q.pagination().normalize(), (1, 20, 0));
    }

    #[test]
    fn open_days_count_defaults_to_a_month() {
        let q = OpenDaysQuery { from: None, count: None };
        assert_eq!(q.count(), 30);
        let q = OpenDaysQuery { from: None, count: Some(0) };
        assert_eq!(q.count(), 1);
    }
}
