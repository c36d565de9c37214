//! Time-prorated pricing for mid-cycle service add-ons.

use chrono::{DateTime, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Days left on a subscription window, rounded up — a partial day still
/// bills as a full one. Zero or negative means the window has lapsed.
pub fn remaining_days(end_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (end_date - now).num_milliseconds() as f64;
    (ms / MS_PER_DAY).ceil() as i64
}

/// Prorated cost of adding an annually-priced service with `remaining` days
/// left in the cycle. Never below one currency unit so the gateway accepts
/// the charge.
pub fn prorated_price(annual_price: i64, remaining: i64) -> i64 {
    let scaled = (remaining as f64 / 365.0 * annual_price as f64).round() as i64;
    scaled.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn hundred_of_365_days_on_1000() {
        // round(100/365 * 1000) = round(273.97...) = 274
        assert_eq!(prorated_price(1000, 100), 274);
    }

    #[test]
    fn floor_of_one_currency_unit() {
        assert_eq!(prorated_price(1, 1), 1);
        assert_eq!(prorated_price(100, 1), 1);
        assert_eq!(prorated_price(0, 300), 1);
    }

    #[test]
    fn full_year_bills_full_price() {
        assert_eq!(prorated_price(999, 365), 999);
    }

    #[test]
    fn partial_day_rounds_up() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        // 10 days minus one hour remaining still counts as 10 days.
        let end = now + Duration::days(10) - Duration::hours(1);
        assert_eq!(remaining_days(end, now), 10);
    }

    #[test]
    fn lapsed_window_is_not_positive() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(remaining_days(now, now), 0);
        assert!(remaining_days(now - Duration::days(3), now) < 0);
    }

    #[test]
    fn exact_days_do_not_round_up() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let end = now + Duration::days(200);
        assert_eq!(remaining_days(end, now), 200);
    }
}
