//! Appointment model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Appointment record (live or archived, same shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Appointment {
    pub id: i64,
    /// Appointment date (scheduling timezone)
    pub date: NaiveDate,
    /// Exact start of the booked slot
    pub time: DateTime<Utc>,
    /// Duration (seconds)
    pub duration: i32,
    pub workman_id: i32,
    pub customer_id: i32,
    /// Regime in effect when the appointment was booked
    pub work_regime_id: i32,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Fields of a new appointment
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub date: NaiveDate,
    pub time: DateTime<Utc>,
    pub duration: i32,
    pub workman_id: i32,
    pub customer_id: i32,
    pub work_regime_id: i32,
}

/// Exact identity of a booked appointment as seen by its customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentKey {
    pub customer_id: i32,
    pub workman_id: i32,
    pub date: NaiveDate,
    pub time: DateTime<Utc>,
}

/// Which appointment table a query reads or writes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentBook {
    #[default]
    Live,
    Archive,
}

impl AppointmentBook {
    pub fn from_archive(from_archive: bool) -> Self {
        if from_archive {
            AppointmentBook::Archive
        } else {
            AppointmentBook::Live
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            AppointmentBook::Live => "appointments",
            AppointmentBook::Archive => "appointments_archive",
        }
    }
}
