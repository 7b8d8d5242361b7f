//! Appointments service: availability queries and booking mutations

use std::sync::Arc;

use chrono::{DateTime, Days, Utc};
use chrono_tz::Tz;

use crate::{
    dates::local_date,
    error::{AppError, AppResult, BookingError, BookingOutcome, ReportError},
    models::{
        appointment::{Appointment, AppointmentBook, AppointmentKey, NewAppointment},
        slot::{SlotInfo, SlotState},
    },
    repository::SchedulingStore,
    scheduling::{
        reports,
        scope::{self, Period, Scope, SlotFilter, SlotQuery},
        ScheduleSettings,
    },
};

#[derive(Clone)]
pub struct AppointmentsService {
    store: Arc<dyn SchedulingStore>,
    settings: ScheduleSettings,
}

impl AppointmentsService {
    pub fn new(store: Arc<dyn SchedulingStore>, settings: ScheduleSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    pub async fn store_ready(&self) -> AppResult<()> {
        self.store.ping().await
    }

    /// Slots in scope of `filter`, narrowed to `state`
    pub async fn slots(&self, filter: &SlotFilter, state: SlotState) -> AppResult<Vec<SlotInfo>> {
        let query = filter.query()?;
        let mut slots = scope::collect(self.store.as_ref(), &query, &self.settings).await?;
        slots.retain(|s| state.matches(s));
        Ok(slots)
    }

    /// "Current workload: N%" over the slots in scope
    pub async fn workload(&self, filter: &SlotFilter) -> AppResult<Result<String, ReportError>> {
        let Ok(query) = filter.query() else {
            return Ok(Err(ReportError::WrongArguments));
        };
        let slots = scope::collect(self.store.as_ref(), &query, &self.settings).await?;
        Ok(reports::workload_message(&slots))
    }

    /// "Available time: ..." over the free slots in scope, displayed in `tz`
    pub async fn available_time(
        &self,
        filter: &SlotFilter,
        tz: &Tz,
    ) -> AppResult<Result<String, ReportError>> {
        let Ok(query) = filter.query() else {
            return Ok(Err(ReportError::WrongArguments));
        };
        let slots = scope::collect(self.store.as_ref(), &query, &self.settings).await?;
        Ok(Ok(reports::available_time_message(&slots, tz)))
    }

    /// The generated, unoccupied slot of `workman_id` starting exactly at `time`.
    ///
    /// Overnight shifts of the previous day are searched as well.
    async fn available_slot(&self, workman_id: i32, time: DateTime<Utc>) -> AppResult<Option<SlotInfo>> {
        let date = local_date(&self.settings.timezone, time);
        let days = [date.checked_sub_days(Days::new(1)), Some(date)];

        for day in days.into_iter().flatten() {
            let query = SlotQuery {
                period: Period::Day(day),
                scope: Scope::Workman(workman_id),
                book: AppointmentBook::Live,
            };
            let slots = scope::collect(self.store.as_ref(), &query, &self.settings).await?;
            if let Some(slot) = slots
                .into_iter()
                .find(|s| s.datetime_begin == time && !s.is_occupied)
            {
                return Ok(Some(slot));
            }
        }
        Ok(None)
    }

    /// Check a requested start: free, and exactly on an available slot
    async fn bookable_slot(&self, workman_id: i32, time: DateTime<Utc>) -> AppResult<BookingOutcome<SlotInfo>> {
        if self
            .store
            .appointment_exists(AppointmentBook::Live, workman_id, time)
            .await?
        {
            return Ok(Err(BookingError::SlotAlreadyTaken));
        }
        Ok(self
            .available_slot(workman_id, time)
            .await?
            .ok_or(BookingError::InvalidSlot))
    }

    fn key(&self, customer_id: i32, workman_id: i32, time: DateTime<Utc>) -> AppointmentKey {
        AppointmentKey {
            customer_id,
            workman_id,
            date: local_date(&self.settings.timezone, time),
            time,
        }
    }

    /// Book `time` with `workman_id` for `customer_id`
    pub async fn create_appointment(
        &self,
        customer_id: i32,
        workman_id: i32,
        time: DateTime<Utc>,
    ) -> AppResult<BookingOutcome<Appointment>> {
        let slot = match self.bookable_slot(workman_id, time).await? {
            Ok(slot) => slot,
            Err(reason) => {
                tracing::warn!(customer_id, workman_id, %time, %reason, "appointment refused");
                return Ok(Err(reason));
            }
        };

        let new = NewAppointment {
            date: local_date(&self.settings.timezone, time),
            time,
            duration: slot.duration,
            workman_id,
            customer_id,
            work_regime_id: slot.work_regime_id,
        };

        match self.store.create_appointment(AppointmentBook::Live, &new).await {
            Ok(appointment) => {
                tracing::info!(
                    appointment_id = appointment.id,
                    customer_id,
                    workman_id,
                    %time,
                    "appointment created"
                );
                Ok(Ok(appointment))
            }
            Err(AppError::Conflict(msg)) => {
                tracing::warn!(customer_id, workman_id, %time, "lost booking race: {}", msg);
                Ok(Err(BookingError::SlotAlreadyTaken))
            }
            Err(e) => Err(e),
        }
    }

    /// Cancel the customer's appointment starting at `time`
    pub async fn cancel_appointment(
        &self,
        customer_id: i32,
        workman_id: i32,
        time: DateTime<Utc>,
    ) -> AppResult<BookingOutcome<()>> {
        let key = self.key(customer_id, workman_id, time);
        let Some(appointment) = self.store.find_appointment(AppointmentBook::Live, &key).await? else {
            return Ok(Err(BookingError::NotFound));
        };

        match self
            .store
            .soft_delete_appointment(AppointmentBook::Live, appointment.id)
            .await
        {
            Ok(()) => {
                tracing::info!(appointment_id = appointment.id, customer_id, workman_id, %time, "appointment cancelled");
                Ok(Ok(()))
            }
            Err(AppError::NotFound(_)) => Ok(Err(BookingError::NotFound)),
            Err(e) => Err(e),
        }
    }

    /// Move the customer's appointment from `time` to `new_time`
    pub async fn move_appointment(
        &self,
        customer_id: i32,
        workman_id: i32,
        time: DateTime<Utc>,
        new_time: DateTime<Utc>,
    ) -> AppResult<BookingOutcome<Appointment>> {
        let key = self.key(customer_id, workman_id, time);
        let Some(appointment) = self.store.find_appointment(AppointmentBook::Live, &key).await? else {
            return Ok(Err(BookingError::NotFound));
        };

        if let Err(reason) = self.bookable_slot(workman_id, new_time).await? {
            tracing::warn!(appointment_id = appointment.id, %new_time, %reason, "appointment move refused");
            return Ok(Err(reason));
        }

        let date = local_date(&self.settings.timezone, new_time);
        match self
            .store
            .reschedule_appointment(AppointmentBook::Live, appointment.id, date, new_time)
            .await
        {
            Ok(moved) => {
                tracing::info!(appointment_id = moved.id, from = %time, to = %new_time, "appointment moved");
                Ok(Ok(moved))
            }
            Err(AppError::Conflict(msg)) => {
                tracing::warn!(appointment_id = appointment.id, %new_time, "lost booking race: {}", msg);
                Ok(Err(BookingError::SlotAlreadyTaken))
            }
            Err(AppError::NotFound(_)) => Ok(Err(BookingError::NotFound)),
            Err(e) => Err(e),
        }
    }
}
