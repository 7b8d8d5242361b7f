//! Query scope resolution and slot collection

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, Utc};

use super::{
    occupancy,
    regime::{self, effective_regime},
    slots::{generate, Clip},
    ScheduleSettings,
};
use crate::{
    dates::local_date,
    error::{AppError, AppResult, ScopeError},
    models::{appointment::AppointmentBook, shop::Workman, slot::SlotInfo},
    repository::SchedulingStore,
};

/// Raw filter arguments of a slot query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotFilter {
    pub date: Option<NaiveDate>,
    pub datetime_begin: Option<DateTime<Utc>>,
    pub datetime_end: Option<DateTime<Utc>>,
    pub repair_shop_id: Option<i32>,
    pub workman_id: Option<i32>,
    pub from_archive: bool,
}

/// Time span of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day(NaiveDate),
    Range {
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Breadth of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Business,
    Shop(i32),
    Workman(i32),
}

/// Fully resolved slot query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotQuery {
    pub period: Period,
    pub scope: Scope,
    pub book: AppointmentBook,
}

impl SlotFilter {
    /// Resolve the query shape. A date wins over a range; a workman wins
    /// over a shop, which wins over the whole business.
    pub fn query(&self) -> Result<SlotQuery, ScopeError> {
        let period = match (self.date, self.datetime_begin, self.datetime_end) {
            (Some(date), _, _) => Period::Day(date),
            (None, Some(begin), Some(end)) => Period::Range { begin, end },
            _ => return Err(ScopeError::InvalidScope),
        };

        let scope = match (self.workman_id, self.repair_shop_id) {
            (Some(workman_id), _) => Scope::Workman(workman_id),
            (None, Some(shop_id)) => Scope::Shop(shop_id),
            (None, None) => Scope::Business,
        };

        Ok(SlotQuery {
            period,
            scope,
            book: AppointmentBook::from_archive(self.from_archive),
        })
    }
}

impl Period {
    /// Calendar days covered, each with the clip applying to it.
    /// Ranges longer than `settings.max_range_days` are refused.
    pub fn days(&self, settings: &ScheduleSettings) -> AppResult<Vec<(NaiveDate, Clip)>> {
        match *self {
            Period::Day(date) => Ok(vec![(date, Clip::none())]),
            Period::Range { begin, end } => {
                let tz = &settings.timezone;
                let (first, last) = (local_date(tz, begin), local_date(tz, end));
                if (last - first).num_days() >= i64::from(settings.max_range_days) {
                    return Err(AppError::Validation(format!(
                        "Date range exceeds {} days",
                        settings.max_range_days
                    )));
                }
                let clip = Clip::between(begin, end);
                let mut days = Vec::new();
                let mut day = first;
                while day <= last {
                    days.push((day, clip));
                    match day.checked_add_days(Days::new(1)) {
                        Some(next) => day = next,
                        None => break,
                    }
                }
                Ok(days)
            }
        }
    }
}

/// Mechanics working under one regime
#[derive(Debug, Clone)]
struct Crew {
    work_regime_id: i32,
    members: Vec<Workman>,
}

/// Every live regime, each with the mechanics whose effective regime it is
async fn business_crews(store: &dyn SchedulingStore) -> AppResult<Vec<Crew>> {
    let shops: HashMap<i32, _> = store
        .list_shops()
        .await?
        .into_iter()
        .map(|shop| (shop.id, shop))
        .collect();
    let workmen = store.list_workmen(None).await?;

    let crews = store
        .list_work_regimes()
        .await?
        .into_iter()
        .map(|regime| Crew {
            work_regime_id: regime.id,
            members: workmen
                .iter()
                .filter(|w| effective_regime(w, shops.get(&w.repair_shop_id)) == Some(regime.id))
                .cloned()
                .collect(),
        })
        .collect();
    Ok(crews)
}

/// The shop's default regime applied to every mechanic of the shop,
/// individual regimes included
async fn shop_crews(store: &dyn SchedulingStore, repair_shop_id: i32) -> AppResult<Vec<Crew>> {
    let Some(shop) = store.find_shop(repair_shop_id).await? else {
        tracing::debug!(repair_shop_id, "repair shop not found, empty scope");
        return Ok(Vec::new());
    };
    let Some(work_regime_id) = shop.default_work_regime_id else {
        tracing::debug!(repair_shop_id, "repair shop has no default regime, empty scope");
        return Ok(Vec::new());
    };

    let members = store.list_workmen(Some(repair_shop_id)).await?;
    Ok(vec![Crew { work_regime_id, members }])
}

/// One mechanic with its effective regime
async fn workman_crews(store: &dyn SchedulingStore, workman_id: i32) -> AppResult<Vec<Crew>> {
    let Some(workman) = store.find_workman(workman_id).await? else {
        tracing::debug!(workman_id, "workman not found, empty scope");
        return Ok(Vec::new());
    };
    let shop = store.find_shop(workman.repair_shop_id).await?;
    let Some(work_regime_id) = effective_regime(&workman, shop.as_ref()) else {
        tracing::debug!(workman_id, "workman has no effective regime, empty scope");
        return Ok(Vec::new());
    };
    Ok(vec![Crew {
        work_regime_id,
        members: vec![workman],
    }])
}

/// Slots of every crew member on one day
async fn collect_day(
    store: &dyn SchedulingStore,
    crews: &[Crew],
    date: NaiveDate,
    clip: Clip,
    book: AppointmentBook,
    settings: &ScheduleSettings,
    out: &mut Vec<SlotInfo>,
) -> AppResult<()> {
    for crew in crews {
        if crew.members.is_empty() {
            continue;
        }
        let Some(window) = regime::resolve(store, crew.work_regime_id, date, settings).await? else {
            continue;
        };
        for workman in &crew.members {
            let slots = generate(&window, clip);
            out.extend(occupancy::mark(store, book, workman, &window, slots).await?);
        }
    }
    Ok(())
}

/// Slots of every crew member across the period
async fn collect_period(
    store: &dyn SchedulingStore,
    crews: &[Crew],
    period: &Period,
    book: AppointmentBook,
    settings: &ScheduleSettings,
) -> AppResult<Vec<SlotInfo>> {
    let mut out = Vec::new();
    for (date, clip) in period.days(settings)? {
        collect_day(store, crews, date, clip, book, settings, &mut out).await?;
    }
    Ok(out)
}

/// Every candidate slot in scope, tagged occupied or available.
///
/// Order: day, then regime, then mechanic (store order), then start time.
pub async fn collect(
    store: &dyn SchedulingStore,
    query: &SlotQuery,
    settings: &ScheduleSettings,
) -> AppResult<Vec<SlotInfo>> {
    let crews = match (query.period, query.scope) {
        (Period::Day(_), Scope::Workman(id)) | (Period::Range { .. }, Scope::Workman(id)) => {
            workman_crews(store, id).await?
        }
        (Period::Day(_), Scope::Shop(id)) | (Period::Range { .. }, Scope::Shop(id)) => {
            shop_crews(store, id).await?
        }
        (Period::Day(_), Scope::Business) | (Period::Range { .. }, Scope::Business) => {
            business_crews(store).await?
        }
    };

    let slots = collect_period(store, &crews, &query.period, query.book, settings).await?;
    tracing::debug!(
        period = ?query.period,
        scope = ?query.scope,
        book = ?query.book,
        slots = slots.len(),
        "collected slots"
    );
    Ok(slots)
}
