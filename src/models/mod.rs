//! Data models for Autoshop

pub mod appointment;
pub mod shop;
pub mod slot;
pub mod user;
pub mod work_regime;

// Re-export commonly used types
pub use appointment::{Appointment, AppointmentBook, AppointmentKey, NewAppointment};
pub use shop::{RepairShop, Workman};
pub use slot::{SlotInfo, SlotState};
pub use user::UserClaims;
pub use work_regime::{DaySchedule, WorkRegime, WorkRegimeDetail, WorkRegimeException};
