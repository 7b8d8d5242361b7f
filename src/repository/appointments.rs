//! Appointments repository (live and archive tables)

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::appointment::{Appointment, AppointmentBook, AppointmentKey, NewAppointment},
};

#[derive(Clone)]
pub struct AppointmentsRepository {
    pool: Pool<Postgres>,
}

/// Turn a unique-index violation on (workman_id, time) into a conflict
fn conflict_or(e: sqlx::Error, time: DateTime<Utc>) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            tracing::warn!(%time, "appointment slot already held by a live record");
            AppError::Conflict(format!("An appointment already exists at {}", time))
        }
        _ => AppError::Database(e),
    }
}

impl AppointmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Check whether a live record holds the given start time
    pub async fn exists(
        &self,
        book: AppointmentBook,
        workman_id: i32,
        time: DateTime<Utc>,
    ) -> AppResult<bool> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE workman_id = $1 AND time = $2 AND deleted_at IS NULL)",
            book.table()
        );
        let exists: bool = sqlx::query_scalar(&query)
            .bind(workman_id)
            .bind(time)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Booked start times of a mechanic within `[from, to]`
    pub async fn booked_times(
        &self,
        book: AppointmentBook,
        workman_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<DateTime<Utc>>> {
        let query = format!(
            r#"
            SELECT time FROM {}
            WHERE workman_id = $1 AND time >= $2 AND time <= $3 AND deleted_at IS NULL
            ORDER BY time
            "#,
            book.table()
        );
        let times: Vec<DateTime<Utc>> = sqlx::query_scalar(&query)
            .bind(workman_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(times)
    }

    /// Find the live appointment matching a customer's key exactly
    pub async fn find(
        &self,
        book: AppointmentBook,
        key: &AppointmentKey,
    ) -> AppResult<Option<Appointment>> {
        let query = format!(
            r#"
            SELECT * FROM {}
            WHERE customer_id = $1 AND workman_id = $2 AND date = $3 AND time = $4
              AND deleted_at IS NULL
            ORDER BY id
            LIMIT 1
            "#,
            book.table()
        );
        let row = sqlx::query_as::<_, Appointment>(&query)
            .bind(key.customer_id)
            .bind(key.workman_id)
            .bind(key.date)
            .bind(key.time)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Create an appointment
    pub async fn create(
        &self,
        book: AppointmentBook,
        data: &NewAppointment,
    ) -> AppResult<Appointment> {
        let now = Utc::now();
        let query = format!(
            r#"
            INSERT INTO {} (date, time, duration, workman_id, customer_id, work_regime_id, crea_date, modif_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
            book.table()
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(data.date)
            .bind(data.time)
            .bind(data.duration)
            .bind(data.workman_id)
            .bind(data.customer_id)
            .bind(data.work_regime_id)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or(e, data.time))
    }

    /// Move an appointment to another date and time, keeping its identity
    pub async fn reschedule(
        &self,
        book: AppointmentBook,
        id: i64,
        date: NaiveDate,
        time: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        let query = format!(
            r#"
            UPDATE {} SET date = $1, time = $2, modif_date = $3
            WHERE id = $4 AND deleted_at IS NULL
            RETURNING *
            "#,
            book.table()
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(date)
            .bind(time)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_or(e, time))?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
    }

    /// Soft-delete an appointment: the row stays, reads no longer see it
    pub async fn soft_delete(&self, book: AppointmentBook, id: i64) -> AppResult<()> {
        let query = format!(
            "UPDATE {} SET deleted_at = $1, modif_date = $1 WHERE id = $2 AND deleted_at IS NULL",
            book.table()
        );
        let result = sqlx::query(&query)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Appointment {} not found", id)));
        }
        Ok(())
    }
}
