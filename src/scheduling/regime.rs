//! Work regime resolution: which hours apply to a regime on a given date

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use super::ScheduleSettings;
use crate::{
    dates::combine,
    error::AppResult,
    models::{
        shop::{RepairShop, Workman},
        work_regime::{day_of_week, DaySchedule},
    },
    repository::SchedulingStore,
};

/// Whether dated regime exceptions take part in day resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExceptionPolicy {
    /// Only weekday details are consulted
    #[default]
    WeekdayOnly,
    /// A dated exception replaces the weekday detail; holidays close the day
    HonourExceptions,
}

/// Concrete working window of one regime on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveWindow {
    pub work_regime_id: i32,
    pub work_begin: DateTime<Utc>,
    pub work_end: DateTime<Utc>,
    pub lunch_begin: Option<DateTime<Utc>>,
    pub lunch_end: Option<DateTime<Utc>>,
    /// Slot duration (seconds)
    pub duration: i32,
    pub is_overnight: bool,
}

impl EffectiveWindow {
    /// Place wall-clock hours on `date` in `tz`.
    ///
    /// Overnight shifts end on the following day; on such shifts a lunch
    /// starting before the work start belongs to the following day too.
    /// Returns `None` for a non-positive slot duration.
    pub fn on_date(schedule: &DaySchedule, date: NaiveDate, tz: &Tz) -> Option<Self> {
        if schedule.appointment_duration <= 0 {
            tracing::warn!(
                work_regime_id = schedule.work_regime_id,
                duration = schedule.appointment_duration,
                "ignoring regime hours with a non-positive appointment duration"
            );
            return None;
        }

        let next_day = date.checked_add_days(Days::new(1))?;

        let work_begin = combine(tz, date, schedule.work_time_begin);
        let work_end_date = if schedule.shift_finish_on_next_day { next_day } else { date };
        let work_end = combine(tz, work_end_date, schedule.work_time_end);

        let (lunch_begin, lunch_end) = match (schedule.lunch_time_begin, schedule.lunch_time_end) {
            (Some(begin), Some(end)) => {
                let lunch_date = if schedule.shift_finish_on_next_day && begin < schedule.work_time_begin {
                    next_day
                } else {
                    date
                };
                let lunch_begin = combine(tz, lunch_date, begin);
                let mut lunch_end = combine(tz, lunch_date, end);
                if end < begin {
                    lunch_end += Duration::days(1);
                }
                (Some(lunch_begin), Some(lunch_end))
            }
            _ => (None, None),
        };

        Some(Self {
            work_regime_id: schedule.work_regime_id,
            work_begin,
            work_end,
            lunch_begin,
            lunch_end,
            duration: schedule.appointment_duration,
            is_overnight: schedule.shift_finish_on_next_day,
        })
    }

    pub fn slot_duration(&self) -> Duration {
        Duration::seconds(i64::from(self.duration))
    }
}

/// Regime in effect for a mechanic: individual override, then shop default, then none
pub fn effective_regime(workman: &Workman, shop: Option<&RepairShop>) -> Option<i32> {
    workman.effective_work_regime_id(shop)
}

/// Wall-clock hours of a regime on `date`, or `None` when it does not work that day
pub async fn day_schedule(
    store: &dyn SchedulingStore,
    work_regime_id: i32,
    date: NaiveDate,
    policy: ExceptionPolicy,
) -> AppResult<Option<DaySchedule>> {
    if policy == ExceptionPolicy::HonourExceptions {
        if let Some(exception) = store.find_regime_exception(work_regime_id, date).await? {
            if exception.is_holiday {
                tracing::debug!(work_regime_id, %date, "regime closed for holiday");
                return Ok(None);
            }
            if let Some(schedule) = exception.day_schedule() {
                return Ok(Some(schedule));
            }
        }
    }

    let detail = store
        .find_regime_detail(work_regime_id, day_of_week(date))
        .await?;
    Ok(detail.map(|d| d.day_schedule()))
}

/// Effective window of a regime on `date`
pub async fn resolve(
    store: &dyn SchedulingStore,
    work_regime_id: i32,
    date: NaiveDate,
    settings: &ScheduleSettings,
) -> AppResult<Option<EffectiveWindow>> {
    let schedule = day_schedule(store, work_regime_id, date, settings.exceptions).await?;
    Ok(schedule.and_then(|s| EffectiveWindow::on_date(&s, date, &settings.timezone)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;
    use chrono::{NaiveTime, TimeZone};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn hours(work_regime_id: i32, begin: NaiveTime, end: NaiveTime) -> DaySchedule {
        DaySchedule {
            work_regime_id,
            work_time_begin: begin,
            work_time_end: end,
            shift_finish_on_next_day: false,
            lunch_time_begin: Some(t(14, 0)),
            lunch_time_end: Some(t(15, 0)),
            appointment_duration: 3600,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 8, d).unwrap()
    }

    #[test]
    fn test_window_on_date() {
        let window = EffectiveWindow::on_date(&hours(1, t(9, 0), t(18, 0)), date(5), &chrono_tz::UTC).unwrap();
        assert_eq!(window.work_begin, Utc.with_ymd_and_hms(2020, 8, 5, 9, 0, 0).unwrap());
        assert_eq!(window.work_end, Utc.with_ymd_and_hms(2020, 8, 5, 18, 0, 0).unwrap());
        assert_eq!(window.lunch_begin, Some(Utc.with_ymd_and_hms(2020, 8, 5, 14, 0, 0).unwrap()));
        assert_eq!(window.slot_duration(), Duration::hours(1));
        assert!(!window.is_overnight);
    }

    #[test]
    fn test_overnight_window_ends_next_day() {
        let mut schedule = hours(1, t(22, 0), t(6, 0));
        schedule.shift_finish_on_next_day = true;
        schedule.lunch_time_begin = Some(t(2, 0));
        schedule.lunch_time_end = Some(t(3, 0));

        let window = EffectiveWindow::on_date(&schedule, date(5), &chrono_tz::UTC).unwrap();
        assert_eq!(window.work_end, Utc.with_ymd_and_hms(2020, 8, 6, 6, 0, 0).unwrap());
        assert_eq!(window.lunch_begin, Some(Utc.with_ymd_and_hms(2020, 8, 6, 2, 0, 0).unwrap()));
        assert_eq!(window.lunch_end, Some(Utc.with_ymd_and_hms(2020, 8, 6, 3, 0, 0).unwrap()));
    }

    #[test]
    fn test_window_localized_in_timezone() {
        let window = EffectiveWindow::on_date(
            &hours(1, t(9, 0), t(18, 0)),
            date(5),
            &chrono_tz::Europe::Moscow,
        )
        .unwrap();
        assert_eq!(window.work_begin, Utc.with_ymd_and_hms(2020, 8, 5, 6, 0, 0).unwrap());
    }

    #[test]
    fn test_non_positive_duration_has_no_window() {
        let mut schedule = hours(1, t(9, 0), t(18, 0));
        schedule.appointment_duration = 0;
        assert!(EffectiveWindow::on_date(&schedule, date(5), &chrono_tz::UTC).is_none());
    }

    #[test]
    fn test_effective_regime_precedence() {
        let shop = RepairShop { id: 1, name: "North".into(), default_work_regime_id: Some(10), deleted_at: None };
        let mut workman = Workman {
            id: 2,
            first_name: "Ann".into(),
            middle_name: None,
            last_name: "Lee".into(),
            repair_shop_id: 1,
            individual_work_regime_id: None,
            deleted_at: None,
        };
        assert_eq!(effective_regime(&workman, Some(&shop)), Some(10));
        assert_eq!(effective_regime(&workman, None), None);

        workman.individual_work_regime_id = Some(20);
        assert_eq!(effective_regime(&workman, Some(&shop)), Some(20));

        let bare = RepairShop { default_work_regime_id: None, ..shop };
        workman.individual_work_regime_id = None;
        assert_eq!(effective_regime(&workman, Some(&bare)), None);
    }

    #[tokio::test]
    async fn test_resolve_weekday_and_exceptions() {
        let store = MemoryStore::new();
        let shop = store.add_shop("North").await;
        let regime = store.add_work_regime(shop.id, "Standard").await.unwrap();
        // 2020-08-05 is a Wednesday (2), 2020-08-09 a Sunday (6)
        store.add_regime_detail(2, hours(regime.id, t(9, 0), t(18, 0))).await.unwrap();
        store.add_regime_exception(regime.id, date(5), true, None).await.unwrap();

        let weekday_only = ScheduleSettings::default();
        let window = resolve(&store, regime.id, date(5), &weekday_only).await.unwrap();
        assert!(window.is_some());
        assert!(resolve(&store, regime.id, date(9), &weekday_only).await.unwrap().is_none());

        let honour = ScheduleSettings {
            exceptions: ExceptionPolicy::HonourExceptions,
            ..ScheduleSettings::default()
        };
        assert!(resolve(&store, regime.id, date(5), &honour).await.unwrap().is_none());

        let short = hours(regime.id, t(10, 0), t(12, 0));
        store.add_regime_exception(regime.id, date(12), false, Some(short)).await.unwrap();
        let window = resolve(&store, regime.id, date(12), &honour).await.unwrap().unwrap();
        assert_eq!(window.work_begin, Utc.with_ymd_and_hms(2020, 8, 12, 10, 0, 0).unwrap());
        assert_eq!(window.work_end, Utc.with_ymd_and_hms(2020, 8, 12, 12, 0, 0).unwrap());

        // exception without hours falls back to the weekday detail
        store.add_regime_exception(regime.id, date(19), false, None).await.unwrap();
        let window = resolve(&store, regime.id, date(19), &honour).await.unwrap().unwrap();
        assert_eq!(window.work_begin, Utc.with_ymd_and_hms(2020, 8, 19, 9, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_soft_deleted_regime_resolves_to_nothing() {
        let store = MemoryStore::new();
        let shop = store.add_shop("North").await;
        let regime = store.add_work_regime(shop.id, "Standard").await.unwrap();
        store.add_regime_detail(2, hours(regime.id, t(9, 0), t(18, 0))).await.unwrap();
        store.soft_delete_work_regime(regime.id).await.unwrap();

        let window = resolve(&store, regime.id, date(5), &ScheduleSettings::default()).await.unwrap();
        assert!(window.is_none());
    }
}
