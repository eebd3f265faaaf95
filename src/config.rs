use std::env;

use anyhow::{Context, anyhow};
use chrono::{NaiveTime, Weekday};

use crate::slots::ShopHours;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub shop: ShopHours,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let shop = shop_hours_from_env()?;
        Ok(Self {
            port,
            database_url,
            host,
            shop,
        })
    }
}

fn shop_hours_from_env() -> anyhow::Result<ShopHours> {
    let defaults = ShopHours::default();

    let open_time = match env::var("SHOP_OPEN_TIME") {
        Ok(raw) => parse_clock(&raw).context("SHOP_OPEN_TIME")?,
        Err(_) => defaults.open_time,
    };
    let close_time = match env::var("SHOP_CLOSE_TIME") {
        Ok(raw) => parse_clock(&raw).context("SHOP_CLOSE_TIME")?,
        Err(_) => defaults.close_time,
    };
    let slot_interval_minutes = match env::var("SHOP_SLOT_INTERVAL_MINUTES") {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .context("SHOP_SLOT_INTERVAL_MINUTES must be a positive integer")?,
        Err(_) => defaults.slot_interval_minutes,
    };
    let closed_days = match env::var("SHOP_CLOSED_DAYS") {
        Ok(raw) => parse_weekdays(&raw).context("SHOP_CLOSED_DAYS")?,
        Err(_) => defaults.closed_days,
    };

    let hours = ShopHours {
        open_time,
        close_time,
        slot_interval_minutes,
        closed_days,
    };
    hours.validate()?;
    Ok(hours)
}

pub fn parse_clock(raw: &str) -> anyhow::Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| anyhow!("invalid time of day {raw:?}, expected HH:MM"))
}

pub fn parse_weekdays(raw: &str) -> anyhow::Result<Vec<Weekday>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Weekday>()
                .map_err(|_| anyhow!("invalid weekday {s:?}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clock_with_and_without_seconds() {
        assert_eq!(
            parse_clock("10:00").unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap()
        );
        assert_eq!(
            parse_clock(" 17:20:00 ").unwrap(),
            NaiveTime::from_hms_opt(17, 20, 0).unwrap()
        );
        assert!(parse_clock("25:00").is_err());
    }

    #[test]
    fn parses_weekday_lists() {
        assert_eq!(parse_weekdays("sun").unwrap(), vec![Weekday::Sun]);
        assert_eq!(
            parse_weekdays("Sunday, mon").unwrap(),
            vec![Weekday::Sun, Weekday::Mon]
        );
        assert!(parse_weekdays("").unwrap().is_empty());
        assert!(parse_weekdays("someday").is_err());
    }
}
