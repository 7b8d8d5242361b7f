//! Repository layer for record storage

pub mod appointments;
pub mod memory;
pub mod shops;
pub mod work_regimes;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        appointment::{Appointment, AppointmentBook, AppointmentKey, NewAppointment},
        shop::{RepairShop, Workman},
        work_regime::{WorkRegime, WorkRegimeDetail, WorkRegimeException},
    },
};

pub use memory::MemoryStore;

/// Record store consumed by the scheduling engine.
///
/// Every read excludes soft-deleted rows. Appointments are never removed
/// physically: `soft_delete_appointment` marks them and they disappear from
/// all subsequent reads. Creating or moving an appointment onto a
/// (workman, time) pair already held by a live record fails with
/// `AppError::Conflict`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    /// Check that the store is reachable
    async fn ping(&self) -> AppResult<()>;

    async fn list_shops(&self) -> AppResult<Vec<RepairShop>>;

    async fn find_shop(&self, id: i32) -> AppResult<Option<RepairShop>>;

    /// Mechanics ordered by last, first and middle name
    async fn list_workmen(&self, repair_shop_id: Option<i32>) -> AppResult<Vec<Workman>>;

    async fn find_workman(&self, id: i32) -> AppResult<Option<Workman>>;

    /// Regimes ordered by id
    async fn list_work_regimes(&self) -> AppResult<Vec<WorkRegime>>;

    async fn find_regime_detail(
        &self,
        work_regime_id: i32,
        day_of_week: i16,
    ) -> AppResult<Option<WorkRegimeDetail>>;

    async fn find_regime_exception(
        &self,
        work_regime_id: i32,
        date: NaiveDate,
    ) -> AppResult<Option<WorkRegimeException>>;

    async fn appointment_exists(
        &self,
        book: AppointmentBook,
        workman_id: i32,
        time: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Start times booked for a mechanic within `[from, to]`
    async fn booked_times(
        &self,
        book: AppointmentBook,
        workman_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<DateTime<Utc>>>;

    async fn find_appointment(
        &self,
        book: AppointmentBook,
        key: &AppointmentKey,
    ) -> AppResult<Option<Appointment>>;

    async fn create_appointment(
        &self,
        book: AppointmentBook,
        data: &NewAppointment,
    ) -> AppResult<Appointment>;

    async fn reschedule_appointment(
        &self,
        book: AppointmentBook,
        id: i64,
        date: NaiveDate,
        time: DateTime<Utc>,
    ) -> AppResult<Appointment>;

    async fn soft_delete_appointment(&self, book: AppointmentBook, id: i64) -> AppResult<()>;
}

/// PostgreSQL-backed repository holding the connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub shops: shops::ShopsRepository,
    pub work_regimes: work_regimes::WorkRegimesRepository,
    pub appointments: appointments::AppointmentsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            shops: shops::ShopsRepository::new(pool.clone()),
            work_regimes: work_regimes::WorkRegimesRepository::new(pool.clone()),
            appointments: appointments::AppointmentsRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl SchedulingStore for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_shops(&self) -> AppResult<Vec<RepairShop>> {
        self.shops.list().await
    }

    async fn find_shop(&self, id: i32) -> AppResult<Option<RepairShop>> {
        self.shops.find(id).await
    }

    async fn list_workmen(&self, repair_shop_id: Option<i32>) -> AppResult<Vec<Workman>> {
        self.shops.list_workmen(repair_shop_id).await
    }

    async fn find_workman(&self, id: i32) -> AppResult<Option<Workman>> {
        self.shops.find_workman(id).await
    }

    async fn list_work_regimes(&self) -> AppResult<Vec<WorkRegime>> {
        self.work_regimes.list().await
    }

    async fn find_regime_detail(
        &self,
        work_regime_id: i32,
        day_of_week: i16,
    ) -> AppResult<Option<WorkRegimeDetail>> {
        self.work_regimes.find_detail(work_regime_id, day_of_week).await
    }

    async fn find_regime_exception(
        &self,
        work_regime_id: i32,
        date: NaiveDate,
    ) -> AppResult<Option<WorkRegimeException>> {
        self.work_regimes.find_exception(work_regime_id, date).await
    }

    async fn appointment_exists(
        &self,
        book: AppointmentBook,
        workman_id: i32,
        time: DateTime<Utc>,
    ) -> AppResult<bool> {
        self.appointments.exists(book, workman_id, time).await
    }

    async fn booked_times(
        &self,
        book: AppointmentBook,
        workman_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<DateTime<Utc>>> {
        self.appointments.booked_times(book, workman_id, from, to).await
    }

    async fn find_appointment(
        &self,
        book: AppointmentBook,
        key: &AppointmentKey,
    ) -> AppResult<Option<Appointment>> {
        self.appointments.find(book, key).await
    }

    async fn create_appointment(
        &self,
        book: AppointmentBook,
        data: &NewAppointment,
    ) -> AppResult<Appointment> {
        self.appointments.create(book, data).await
    }

    async fn reschedule_appointment(
        &self,
        book: AppointmentBook,
        id: i64,
        date: NaiveDate,
        time: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        self.appointments.reschedule(book, id, date, time).await
    }

    async fn soft_delete_appointment(&self, book: AppointmentBook, id: i64) -> AppResult<()> {
        self.appointments.soft_delete(book, id).await
    }
}
