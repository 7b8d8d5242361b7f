//! In-memory record store with the same semantics as the PostgreSQL one

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use super::SchedulingStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        appointment::{Appointment, AppointmentBook, AppointmentKey, NewAppointment},
        shop::{RepairShop, Workman},
        work_regime::{DaySchedule, WorkRegime, WorkRegimeDetail, WorkRegimeException},
    },
};

#[derive(Default)]
struct MemoryData {
    next_id: i64,
    shops: Vec<RepairShop>,
    workmen: Vec<Workman>,
    regimes: Vec<WorkRegime>,
    details: Vec<WorkRegimeDetail>,
    exceptions: Vec<WorkRegimeException>,
    live: Vec<Appointment>,
    archive: Vec<Appointment>,
}

impl MemoryData {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn book(&self, book: AppointmentBook) -> &Vec<Appointment> {
        match book {
            AppointmentBook::Live => &self.live,
            AppointmentBook::Archive => &self.archive,
        }
    }

    fn book_mut(&mut self, book: AppointmentBook) -> &mut Vec<Appointment> {
        match book {
            AppointmentBook::Live => &mut self.live,
            AppointmentBook::Archive => &mut self.archive,
        }
    }

    fn regime_alive(&self, id: i32) -> bool {
        self.regimes.iter().any(|r| r.id == id && r.deleted_at.is_none())
    }

    fn slot_taken(&self, book: AppointmentBook, workman_id: i32, time: DateTime<Utc>, except: Option<i64>) -> bool {
        self.book(book).iter().any(|a| {
            a.deleted_at.is_none()
                && a.workman_id == workman_id
                && a.time == time
                && Some(a.id) != except
        })
    }
}

/// Record store kept in process memory
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_shop(&self, name: &str) -> RepairShop {
        let mut data = self.data.write().await;
        let shop = RepairShop {
            id: data.next_id() as i32,
            name: name.to_string(),
            default_work_regime_id: None,
            deleted_at: None,
        };
        data.shops.push(shop.clone());
        shop
    }

    /// Create a regime owned by `repair_shop_id`; it becomes the shop default
    /// when the shop has none yet.
    pub async fn add_work_regime(&self, repair_shop_id: i32, name: &str) -> AppResult<WorkRegime> {
        let mut data = self.data.write().await;
        let regime = WorkRegime {
            id: data.next_id() as i32,
            name: name.to_string(),
            repair_shop_id,
            deleted_at: None,
        };
        let shop = data
            .shops
            .iter_mut()
            .find(|s| s.id == repair_shop_id)
            .ok_or_else(|| AppError::NotFound(format!("Repair shop {} not found", repair_shop_id)))?;
        if shop.default_work_regime_id.is_none() {
            shop.default_work_regime_id = Some(regime.id);
        }
        data.regimes.push(regime.clone());
        Ok(regime)
    }

    pub async fn set_default_work_regime(&self, repair_shop_id: i32, work_regime_id: Option<i32>) -> AppResult<()> {
        let mut data = self.data.write().await;
        let shop = data
            .shops
            .iter_mut()
            .find(|s| s.id == repair_shop_id)
            .ok_or_else(|| AppError::NotFound(format!("Repair shop {} not found", repair_shop_id)))?;
        shop.default_work_regime_id = work_regime_id;
        Ok(())
    }

    pub async fn soft_delete_work_regime(&self, id: i32) -> AppResult<()> {
        let mut data = self.data.write().await;
        let regime = data
            .regimes
            .iter_mut()
            .find(|r| r.id == id && r.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound(format!("Work regime {} not found", id)))?;
        regime.deleted_at = Some(Utc::now());
        Ok(())
    }

    /// Set the hours of a regime for one weekday (0=Monday)
    pub async fn add_regime_detail(&self, day_of_week: i16, hours: DaySchedule) -> AppResult<WorkRegimeDetail> {
        let mut data = self.data.write().await;
        let duplicate = data.details.iter().any(|d| {
            d.deleted_at.is_none()
                && d.work_regime_id == hours.work_regime_id
                && d.day_of_week == day_of_week
        });
        if duplicate {
            return Err(AppError::Conflict(format!(
                "Work regime {} already has hours for day {}",
                hours.work_regime_id, day_of_week
            )));
        }
        let detail = WorkRegimeDetail {
            id: data.next_id() as i32,
            work_regime_id: hours.work_regime_id,
            day_of_week,
            work_time_begin: hours.work_time_begin,
            work_time_end: hours.work_time_end,
            shift_finish_on_next_day: hours.shift_finish_on_next_day,
            lunch_time_begin: hours.lunch_time_begin,
            lunch_time_end: hours.lunch_time_end,
            appointment_duration: hours.appointment_duration,
            deleted_at: None,
        };
        data.details.push(detail.clone());
        Ok(detail)
    }

    /// Override a regime on one date; `hours: None` leaves work times unset
    pub async fn add_regime_exception(
        &self,
        work_regime_id: i32,
        date: NaiveDate,
        is_holiday: bool,
        hours: Option<DaySchedule>,
    ) -> AppResult<WorkRegimeException> {
        let mut data = self.data.write().await;
        let duplicate = data.exceptions.iter().any(|e| {
            e.deleted_at.is_none() && e.work_regime_id == work_regime_id && e.date == date
        });
        if duplicate {
            return Err(AppError::Conflict(format!(
                "Work regime {} already has an exception on {}",
                work_regime_id, date
            )));
        }
        let exception = WorkRegimeException {
            id: data.next_id() as i32,
            work_regime_id,
            date,
            is_holiday,
            work_time_begin: hours.map(|h| h.work_time_begin),
            work_time_end: hours.map(|h| h.work_time_end),
            shift_finish_on_next_day: hours.is_some_and(|h| h.shift_finish_on_next_day),
            lunch_time_begin: hours.and_then(|h| h.lunch_time_begin),
            lunch_time_end: hours.and_then(|h| h.lunch_time_end),
            appointment_duration: hours
                .map(|h| h.appointment_duration)
                .unwrap_or(crate::models::work_regime::DEFAULT_APPOINTMENT_DURATION),
            deleted_at: None,
        };
        data.exceptions.push(exception.clone());
        Ok(exception)
    }

    pub async fn add_workman(
        &self,
        repair_shop_id: i32,
        first_name: &str,
        last_name: &str,
        individual_work_regime_id: Option<i32>,
    ) -> Workman {
        let mut data = self.data.write().await;
        let workman = Workman {
            id: data.next_id() as i32,
            first_name: first_name.to_string(),
            middle_name: None,
            last_name: last_name.to_string(),
            repair_shop_id,
            individual_work_regime_id,
            deleted_at: None,
        };
        data.workmen.push(workman.clone());
        workman
    }

    /// Every record of a book that has not been soft-deleted, in insertion order
    pub async fn appointments(&self, book: AppointmentBook) -> Vec<Appointment> {
        let data = self.data.read().await;
        data.book(book)
            .iter()
            .filter(|a| a.deleted_at.is_none())
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SchedulingStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn list_shops(&self) -> AppResult<Vec<RepairShop>> {
        let data = self.data.read().await;
        Ok(data.shops.iter().filter(|s| s.deleted_at.is_none()).cloned().collect())
    }

    async fn find_shop(&self, id: i32) -> AppResult<Option<RepairShop>> {
        let data = self.data.read().await;
        Ok(data.shops.iter().find(|s| s.id == id && s.deleted_at.is_none()).cloned())
    }

    async fn list_workmen(&self, repair_shop_id: Option<i32>) -> AppResult<Vec<Workman>> {
        let data = self.data.read().await;
        let mut workmen: Vec<Workman> = data
            .workmen
            .iter()
            .filter(|w| w.deleted_at.is_none())
            .filter(|w| repair_shop_id.map_or(true, |id| w.repair_shop_id == id))
            .cloned()
            .collect();
        workmen.sort_by(|a, b| {
            (&a.last_name, &a.first_name, &a.middle_name, a.id)
                .cmp(&(&b.last_name, &b.first_name, &b.middle_name, b.id))
        });
        Ok(workmen)
    }

    async fn find_workman(&self, id: i32) -> AppResult<Option<Workman>> {
        let data = self.data.read().await;
        Ok(data.workmen.iter().find(|w| w.id == id && w.deleted_at.is_none()).cloned())
    }

    async fn list_work_regimes(&self) -> AppResult<Vec<WorkRegime>> {
        let data = self.data.read().await;
        let mut regimes: Vec<WorkRegime> =
            data.regimes.iter().filter(|r| r.deleted_at.is_none()).cloned().collect();
        regimes.sort_by_key(|r| r.id);
        Ok(regimes)
    }

    async fn find_regime_detail(
        &self,
        work_regime_id: i32,
        day_of_week: i16,
    ) -> AppResult<Option<WorkRegimeDetail>> {
        let data = self.data.read().await;
        if !data.regime_alive(work_regime_id) {
            return Ok(None);
        }
        Ok(data
            .details
            .iter()
            .find(|d| {
                d.deleted_at.is_none()
                    && d.work_regime_id == work_regime_id
                    && d.day_of_week == day_of_week
            })
            .cloned())
    }

    async fn find_regime_exception(
        &self,
        work_regime_id: i32,
        date: NaiveDate,
    ) -> AppResult<Option<WorkRegimeException>> {
        let data = self.data.read().await;
        if !data.regime_alive(work_regime_id) {
            return Ok(None);
        }
        Ok(data
            .exceptions
            .iter()
            .find(|e| e.deleted_at.is_none() && e.work_regime_id == work_regime_id && e.date == date)
            .cloned())
    }

    async fn appointment_exists(
        &self,
        book: AppointmentBook,
        workman_id: i32,
        time: DateTime<Utc>,
    ) -> AppResult<bool> {
        let data = self.data.read().await;
        Ok(data.slot_taken(book, workman_id, time, None))
    }

    async fn booked_times(
        &self,
        book: AppointmentBook,
        workman_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<DateTime<Utc>>> {
        let data = self.data.read().await;
        let mut times: Vec<DateTime<Utc>> = data
            .book(book)
            .iter()
            .filter(|a| {
                a.deleted_at.is_none() && a.workman_id == workman_id && a.time >= from && a.time <= to
            })
            .map(|a| a.time)
            .collect();
        times.sort();
        Ok(times)
    }

    async fn find_appointment(
        &self,
        book: AppointmentBook,
        key: &AppointmentKey,
    ) -> AppResult<Option<Appointment>> {
        let data = self.data.read().await;
        Ok(data
            .book(book)
            .iter()
            .find(|a| {
                a.deleted_at.is_none()
                    && a.customer_id == key.customer_id
                    && a.workman_id == key.workman_id
                    && a.date == key.date
                    && a.time == key.time
            })
            .cloned())
    }

    async fn create_appointment(
        &self,
        book: AppointmentBook,
        new: &NewAppointment,
    ) -> AppResult<Appointment> {
        let mut data = self.data.write().await;
        if data.slot_taken(book, new.workman_id, new.time, None) {
            return Err(AppError::Conflict(format!(
                "An appointment already exists at {}",
                new.time
            )));
        }
        let now = Utc::now();
        let appointment = Appointment {
            id: data.next_id(),
            date: new.date,
            time: new.time,
            duration: new.duration,
            workman_id: new.workman_id,
            customer_id: new.customer_id,
            work_regime_id: new.work_regime_id,
            crea_date: Some(now),
            modif_date: Some(now),
            deleted_at: None,
        };
        data.book_mut(book).push(appointment.clone());
        Ok(appointment)
    }

    async fn reschedule_appointment(
        &self,
        book: AppointmentBook,
        id: i64,
        date: NaiveDate,
        time: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        let mut data = self.data.write().await;
        let workman_id = data
            .book(book)
            .iter()
            .find(|a| a.id == id && a.deleted_at.is_none())
            .map(|a| a.workman_id)
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;
        if data.slot_taken(book, workman_id, time, Some(id)) {
            return Err(AppError::Conflict(format!(
                "An appointment already exists at {}",
                time
            )));
        }
        let appointment = data
            .book_mut(book)
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;
        appointment.date = date;
        appointment.time = time;
        appointment.modif_date = Some(Utc::now());
        Ok(appointment.clone())
    }

    async fn soft_delete_appointment(&self, book: AppointmentBook, id: i64) -> AppResult<()> {
        let mut data = self.data.write().await;
        let appointment = data
            .book_mut(book)
            .iter_mut()
            .find(|a| a.id == id && a.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;
        let now = Utc::now();
        appointment.deleted_at = Some(now);
        appointment.modif_date = Some(now);
        Ok(())
    }
}
