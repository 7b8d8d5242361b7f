//! Aggregations over collected slots

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{dates::format_display, error::ReportError, models::slot::SlotInfo};

/// Share of occupied slots in percent, rounded to two decimals with ties
/// to even. `None` when there are no slots at all.
pub fn workload_percentage(slots: &[SlotInfo]) -> Option<f64> {
    if slots.is_empty() {
        return None;
    }
    let occupied = slots.iter().filter(|s| s.is_occupied).count() as f64;
    let pct = occupied / slots.len() as f64 * 100.0;
    Some((pct * 100.0).round_ties_even() / 100.0)
}

/// Shortest decimal form, keeping one fractional digit on whole numbers
fn format_percentage(pct: f64) -> String {
    if pct.fract() == 0.0 {
        format!("{:.1}", pct)
    } else {
        format!("{}", pct)
    }
}

pub fn workload_message(slots: &[SlotInfo]) -> Result<String, ReportError> {
    let pct = workload_percentage(slots).ok_or(ReportError::EmptyScope)?;
    Ok(format!("Current workload: {}%", format_percentage(pct)))
}

/// Distinct free start times, earliest first
pub fn available_start_times(slots: &[SlotInfo]) -> Vec<DateTime<Utc>> {
    slots
        .iter()
        .filter(|s| !s.is_occupied)
        .map(|s| s.datetime_begin)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn available_time_message(slots: &[SlotInfo], tz: &Tz) -> String {
    let times: Vec<String> = available_start_times(slots)
        .into_iter()
        .map(|t| format_display(tz, t))
        .collect();
    format!("Available time: {}", times.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use test_case::test_case;

    fn slot(workman_id: i32, hour: u32, is_occupied: bool) -> SlotInfo {
        let begin = Utc.with_ymd_and_hms(2020, 8, 5, hour, 0, 0).unwrap();
        SlotInfo {
            repair_shop_id: 1,
            workman_id,
            work_regime_id: 1,
            datetime_begin: begin,
            datetime_end: begin + Duration::hours(1),
            duration: 3600,
            is_occupied,
        }
    }

    fn slots(occupied: usize, total: usize) -> Vec<SlotInfo> {
        (0..total).map(|i| slot(1, 9, i < occupied)).collect()
    }

    #[test_case(15, 40, "Current workload: 37.5%" ; "fractional")]
    #[test_case(2, 5, "Current workload: 40.0%" ; "whole number")]
    #[test_case(1, 3, "Current workload: 33.33%" ; "rounded")]
    #[test_case(1, 800, "Current workload: 0.12%" ; "tie rounds down to even")]
    #[test_case(3, 800, "Current workload: 0.38%" ; "tie rounds up to even")]
    #[test_case(0, 8, "Current workload: 0.0%" ; "idle")]
    #[test_case(8, 8, "Current workload: 100.0%" ; "full")]
    fn test_workload_message(occupied: usize, total: usize, expected: &str) {
        assert_eq!(workload_message(&slots(occupied, total)).unwrap(), expected);
    }

    #[test]
    fn test_workload_of_empty_scope() {
        assert_eq!(workload_percentage(&[]), None);
        assert_eq!(workload_message(&[]), Err(ReportError::EmptyScope));
    }

    #[test]
    fn test_available_times_are_sorted_and_unique() {
        let slots = vec![slot(2, 11, false), slot(1, 9, false), slot(1, 10, true), slot(2, 9, false)];
        let times = available_start_times(&slots);
        assert_eq!(
            times,
            vec![
                Utc.with_ymd_and_hms(2020, 8, 5, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2020, 8, 5, 11, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn test_available_time_message_in_timezone() {
        let slots = vec![slot(1, 9, false), slot(1, 10, false), slot(1, 11, true)];
        assert_eq!(
            available_time_message(&slots, &chrono_tz::UTC),
            "Available time: 2020/08/05 09:00; 2020/08/05 10:00"
        );
        assert_eq!(
            available_time_message(&slots, &chrono_tz::Europe::Moscow),
            "Available time: 2020/08/05 12:00; 2020/08/05 13:00"
        );
        assert_eq!(available_time_message(&[], &chrono_tz::UTC), "Available time: ");
    }
}
