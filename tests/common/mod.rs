//! Shared fixtures: one repair shop, five mechanics, 09:00-18:00 every day
//! with lunch 14:00-15:00 and one-hour slots.

#![allow(dead_code)]

use std::sync::Arc;

use autoshop_server::{
    models::{
        Appointment, AppointmentBook, DaySchedule, NewAppointment, RepairShop, WorkRegime, Workman,
    },
    repository::{MemoryStore, SchedulingStore},
    scheduling::ScheduleSettings,
    services::appointments::AppointmentsService,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

pub const CUSTOMER_ID: i32 = 1;

/// Start offsets (hours from 09:00) left free by `book_day`; 14:00 is lunch
pub const MISSED_HOURS: [i64; 3] = [2, 3, 5];

pub struct Fixture {
    pub store: MemoryStore,
    pub service: AppointmentsService,
    pub shop: RepairShop,
    pub regime: WorkRegime,
    pub workmen: Vec<Workman>,
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 8, day, hour, 0, 0).unwrap()
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 8, day).unwrap()
}

pub fn hours(work_regime_id: i32, begin: u32, end: u32, lunch: Option<(u32, u32)>) -> DaySchedule {
    let t = |h: u32| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
    DaySchedule {
        work_regime_id,
        work_time_begin: t(begin),
        work_time_end: t(end),
        shift_finish_on_next_day: false,
        lunch_time_begin: lunch.map(|(b, _)| t(b)),
        lunch_time_end: lunch.map(|(_, e)| t(e)),
        appointment_duration: 3600,
    }
}

/// Regime owned by `shop_id` with the same hours on all seven weekdays
pub async fn weekly_regime(store: &MemoryStore, shop_id: i32, schedule: DaySchedule) -> WorkRegime {
    let regime = store.add_work_regime(shop_id, "Standard").await.unwrap();
    for day_of_week in 0..7 {
        let schedule = DaySchedule {
            work_regime_id: regime.id,
            ..schedule
        };
        store.add_regime_detail(day_of_week, schedule).await.unwrap();
    }
    regime
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_settings(ScheduleSettings::default()).await
    }

    pub async fn with_settings(settings: ScheduleSettings) -> Self {
        let store = MemoryStore::new();
        let shop = store.add_shop("test-name-repair-shop").await;
        let regime = weekly_regime(&store, shop.id, hours(0, 9, 18, Some((14, 15)))).await;

        let mut workmen = Vec::new();
        for suffix in 1..=5 {
            let workman = store
                .add_workman(
                    shop.id,
                    &format!("test-first-name-{}", suffix),
                    &format!("test-last-name-{}", suffix),
                    None,
                )
                .await;
            workmen.push(workman);
        }

        let service = AppointmentsService::new(Arc::new(store.clone()), settings);
        let shop = store.find_shop(shop.id).await.unwrap().unwrap();

        Self {
            store,
            service,
            shop,
            regime,
            workmen,
        }
    }

    /// Insert a live record straight into the store
    pub async fn insert(&self, workman_id: i32, time: DateTime<Utc>) -> Appointment {
        self.store
            .create_appointment(
                AppointmentBook::Live,
                &NewAppointment {
                    date: time.date_naive(),
                    time,
                    duration: 3600,
                    workman_id,
                    customer_id: CUSTOMER_ID,
                    work_regime_id: self.regime.id,
                },
            )
            .await
            .unwrap()
    }

    /// Book the first three mechanics from `start` on for eight hours,
    /// skipping `MISSED_HOURS`: five occupied slots each.
    pub async fn book_day(&self, start: DateTime<Utc>) {
        for workman in &self.workmen[..3] {
            for offset in 0..8 {
                if MISSED_HOURS.contains(&offset) {
                    continue;
                }
                self.insert(workman.id, start + Duration::hours(offset)).await;
            }
        }
    }

    /// `book_day` for every day starting at `begin` while before `end`
    pub async fn book_range(&self, begin: DateTime<Utc>, end: DateTime<Utc>) {
        let mut start = begin;
        while start < end {
            self.book_day(start).await;
            start += Duration::days(1);
        }
    }
}
