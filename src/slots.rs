//! Slot availability engine.
//!
//! Pure functions over the fixed daily grid of slot start times. Nothing in here
//! touches the store; [`crate::services::booking_service::BookingService`] feeds
//! these with the occupied intervals it reads.

use anyhow::bail;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

/// A `[start, end)` interval already taken by a non-cancelled appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupiedInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Operator-set opening hours of the shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopHours {
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub slot_interval_minutes: u32,
    pub closed_days: Vec<Weekday>,
}

impl Default for ShopHours {
    fn default() -> Self {
        Self {
            open_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN),
            close_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            slot_interval_minutes: 40,
            closed_days: vec![Weekday::Sun],
        }
    }
}

impl ShopHours {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.slot_interval_minutes == 0 {
            bail!("slot interval must be greater than zero");
        }
        if self.open_time >= self.close_time {
            bail!(
                "opening time {} must be before closing time {}",
                self.open_time,
                self.close_time
            );
        }
        Ok(())
    }

    pub fn is_open_day(&self, date: NaiveDate) -> bool {
        !self.closed_days.contains(&date.weekday())
    }

    /// The shop's full grid of slot start times for one business day.
    pub fn daily_slots(&self) -> Vec<NaiveTime> {
        generate_daily_slots(self.open_time, self.close_time, self.slot_interval_minutes)
    }

    /// The next `count` bookable dates starting at `from` (inclusive).
    pub fn upcoming_open_days(&self, from: NaiveDate, count: usize) -> Vec<NaiveDate> {
        if self.closed_days.len() >= 7 {
            return Vec::new();
        }
        from.iter_days()
            .filter(|date| self.is_open_day(*date))
            .take(count)
            .collect()
    }
}

/// Slot start times from `open_time`, stepping by `interval_minutes`, strictly
/// before `close_time`. A zero interval yields no slots.
pub fn generate_daily_slots(
    open_time: NaiveTime,
    close_time: NaiveTime,
    interval_minutes: u32,
) -> Vec<NaiveTime> {
    let mut slots = Vec::new();
    if interval_minutes == 0 {
        return slots;
    }

    let step = Duration::minutes(i64::from(interval_minutes));
    let mut current = open_time;
    while current < close_time {
        slots.push(current);
        let (next, wrapped) = current.overflowing_add_signed(step);
        if wrapped != 0 {
            break;
        }
        current = next;
    }
    slots
}

/// Keeps every slot of `all_slots` whose start time is not the start of an
/// occupied interval. Grid order is preserved.
pub fn filter_available(all_slots: &[NaiveTime], occupied: &[OccupiedInterval]) -> Vec<NaiveTime> {
    all_slots
        .iter()
        .copied()
        .filter(|slot| !occupied.iter().any(|interval| interval.start == *slot))
        .collect()
}

/// `start + duration_minutes`. Appointments never cross midnight, so a sum past
/// the end of the day is clamped to 23:59:59.
pub fn compute_end_time(start: NaiveTime, duration_minutes: u32) -> NaiveTime {
    let (end, wrapped) =
        start.overflowing_add_signed(Duration::minutes(i64::from(duration_minutes)));
    if wrapped != 0 {
        return NaiveTime::from_num_seconds_from_midnight_opt(86_399, 0).unwrap_or(end);
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn shop_grid_has_twelve_slots() {
        let slots = generate_daily_slots(t(10, 0), t(18, 0), 40);
        assert_eq!(slots.len(), 12);
        assert_eq!(slots.first(), Some(&t(10, 0)));
        assert_eq!(slots.last(), Some(&t(17, 20)));
        assert!(slots.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(slots[1], t(10, 40));
        assert_eq!(slots[2], t(11, 20));
    }

    #[test]
    fn grid_stops_strictly_before_close() {
        let slots = generate_daily_slots(t(10, 0), t(11, 0), 30);
        assert_eq!(slots, vec![t(10, 0), t(10, 30)]);
    }

    #[test]
    fn degenerate_grids_are_empty() {
        assert!(generate_daily_slots(t(10, 0), t(18, 0), 0).is_empty());
        assert!(generate_daily_slots(t(18, 0), t(10, 0), 40).is_empty());
    }

    #[test]
    fn grid_ending_at_midnight_does_not_wrap() {
        let slots = generate_daily_slots(t(22, 0), NaiveTime::from_hms_opt(23, 59, 59).unwrap(), 60);
        assert_eq!(slots, vec![t(22, 0), t(23, 0)]);
    }

    #[test]
    fn nothing_occupied_keeps_the_grid() {
        let grid = generate_daily_slots(t(10, 0), t(18, 0), 40);
        assert_eq!(filter_available(&grid, &[]), grid);
    }

    #[test]
    fn occupied_starts_are_removed_in_order() {
        let grid = generate_daily_slots(t(10, 0), t(18, 0), 40);
        let occupied = [
            OccupiedInterval { start: t(14, 0), end: t(14, 30) },
            OccupiedInterval { start: t(10, 0), end: t(10, 40) },
        ];
        let available = filter_available(&grid, &occupied);

        assert_eq!(available.len(), 10);
        assert!(!available.contains(&t(10, 0)));
        assert!(!available.contains(&t(14, 0)));
        let mut cursor = grid.iter();
        assert!(available.iter().all(|slot| cursor.any(|g| g == slot)));
    }

    #[test]
    fn only_start_time_equality_collides() {
        let grid = vec![t(10, 0), t(10, 40), t(11, 20)];
        // 10:00-11:00 overlaps the 10:40 slot but does not start on it.
        let occupied = [OccupiedInterval { start: t(10, 0), end: t(11, 0) }];
        assert_eq!(filter_available(&grid, &occupied), vec![t(10, 40), t(11, 20)]);
    }

    #[test]
    fn off_grid_occupation_removes_nothing() {
        let grid = vec![t(10, 0), t(10, 40)];
        let occupied = [OccupiedInterval { start: t(10, 15), end: t(10, 45) }];
        assert_eq!(filter_available(&grid, &occupied), grid);
    }

    #[test_case(t(10, 0), 40, t(10, 40) ; "plain addition")]
    #[test_case(t(17, 20), 40, t(18, 0) ; "lands on closing time")]
    #[test_case(t(10, 50), 15, t(11, 5) ; "carries into next hour")]
    #[test_case(t(14, 0), 30, t(14, 30) ; "combo service")]
    #[test_case(t(9, 45), 135, t(12, 0) ; "multi hour carry")]
    fn end_time_adds_duration(start: NaiveTime, minutes: u32, expected: NaiveTime) {
        assert_eq!(compute_end_time(start, minutes), expected);
    }

    #[test]
    fn end_time_is_clamped_at_end_of_day() {
        let end = compute_end_time(t(23, 30), 60);
        assert_eq!(end, NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn sundays_are_closed_by_default() {
        let hours = ShopHours::default();
        // 2026-10-18 is a Sunday, 2026-10-20 a Tuesday.
        assert!(!hours.is_open_day(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()));
        assert!(hours.is_open_day(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()));
    }

    #[test]
    fn upcoming_open_days_skip_closed_weekdays() {
        let hours = ShopHours::default();
        let saturday = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let days = hours.upcoming_open_days(saturday, 3);
        assert_eq!(
            days,
            vec![
                saturday,
                NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            ]
        );
        assert!(days.iter().all(|d| d.weekday() != Weekday::Sun));
    }

    #[test]
    fn shop_closed_every_day_offers_nothing() {
        let hours = ShopHours {
            closed_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ],
            ..ShopHours::default()
        };
        let from = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert!(hours.upcoming_open_days(from, 5).is_empty());
    }

    #[test]
    fn validate_rejects_inverted_hours_and_zero_interval() {
        assert!(ShopHours::default().validate().is_ok());
        let inverted = ShopHours {
            open_time: t(18, 0),
            close_time: t(10, 0),
            ..ShopHours::default()
        };
        assert!(inverted.validate().is_err());
        let zero = ShopHours {
            slot_interval_minutes: 0,
            ..ShopHours::default()
        };
        assert!(zero.validate().is_err());
    }
}
