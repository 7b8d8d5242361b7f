//! Work regime models (weekly details, dated exceptions)

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Default appointment duration in seconds
pub const DEFAULT_APPOINTMENT_DURATION: i32 = 3600;

/// Day of week as stored in `work_regime_details.day_of_week` (0=Monday, 6=Sunday)
pub fn day_of_week(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_monday() as i16
}

// ---------------------------------------------------------------------------
// WorkRegime
// ---------------------------------------------------------------------------

/// A named weekly schedule owned by a repair shop
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkRegime {
    pub id: i32,
    /// Regime name
    pub name: String,
    /// Owning repair shop
    pub repair_shop_id: i32,
    pub deleted_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// WorkRegimeDetail
// ---------------------------------------------------------------------------

/// Working hours of a regime for one day of the week
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkRegimeDetail {
    pub id: i32,
    pub work_regime_id: i32,
    /// Day of week (0=Monday, 6=Sunday)
    pub day_of_week: i16,
    pub work_time_begin: NaiveTime,
    pub work_time_end: NaiveTime,
    /// Shift ends on the next calendar day
    pub shift_finish_on_next_day: bool,
    pub lunch_time_begin: Option<NaiveTime>,
    pub lunch_time_end: Option<NaiveTime>,
    /// Appointment duration (seconds)
    pub appointment_duration: i32,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl WorkRegimeDetail {
    pub fn day_schedule(&self) -> DaySchedule {
        DaySchedule {
            work_regime_id: self.work_regime_id,
            work_time_begin: self.work_time_begin,
            work_time_end: self.work_time_end,
            shift_finish_on_next_day: self.shift_finish_on_next_day,
            lunch_time_begin: self.lunch_time_begin,
            lunch_time_end: self.lunch_time_end,
            appointment_duration: self.appointment_duration,
        }
    }
}

// ---------------------------------------------------------------------------
// WorkRegimeException
// ---------------------------------------------------------------------------

/// Dated override of a regime (shortened day, holiday...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkRegimeException {
    pub id: i32,
    pub work_regime_id: i32,
    pub date: NaiveDate,
    /// Shop is closed for the whole day
    pub is_holiday: bool,
    pub work_time_begin: Option<NaiveTime>,
    pub work_time_end: Option<NaiveTime>,
    pub shift_finish_on_next_day: bool,
    pub lunch_time_begin: Option<NaiveTime>,
    pub lunch_time_end: Option<NaiveTime>,
    pub appointment_duration: i32,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl WorkRegimeException {
    /// Working hours for the exception date, if it defines any.
    /// Holidays and exceptions without both work times return `None`.
    pub fn day_schedule(&self) -> Option<DaySchedule> {
        if self.is_holiday {
            return None;
        }
        let (begin, end) = (self.work_time_begin?, self.work_time_end?);
        Some(DaySchedule {
            work_regime_id: self.work_regime_id,
            work_time_begin: begin,
            work_time_end: end,
            shift_finish_on_next_day: self.shift_finish_on_next_day,
            lunch_time_begin: self.lunch_time_begin,
            lunch_time_end: self.lunch_time_end,
            appointment_duration: self.appointment_duration,
        })
    }
}

/// Wall-clock working hours of one regime for one day, whatever their source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySchedule {
    pub work_regime_id: i32,
    pub work_time_begin: NaiveTime,
    pub work_time_end: NaiveTime,
    pub shift_finish_on_next_day: bool,
    pub lunch_time_begin: Option<NaiveTime>,
    pub lunch_time_end: Option<NaiveTime>,
    pub appointment_duration: i32,
}
