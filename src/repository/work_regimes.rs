//! Work regimes repository (regimes, weekday details, dated exceptions)

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::work_regime::{WorkRegime, WorkRegimeDetail, WorkRegimeException},
};

#[derive(Clone)]
pub struct WorkRegimesRepository {
    pool: Pool<Postgres>,
}

impl WorkRegimesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List live regimes, ordered by id
    pub async fn list(&self) -> AppResult<Vec<WorkRegime>> {
        let rows = sqlx::query_as::<_, WorkRegime>(
            "SELECT * FROM work_regimes WHERE deleted_at IS NULL ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Weekday detail of a live regime
    pub async fn find_detail(
        &self,
        work_regime_id: i32,
        day_of_week: i16,
    ) -> AppResult<Option<WorkRegimeDetail>> {
        let row = sqlx::query_as::<_, WorkRegimeDetail>(
            r#"
            SELECT d.*
            FROM work_regime_details d
            JOIN work_regimes r ON r.id = d.work_regime_id
            WHERE d.work_regime_id = $1
              AND d.day_of_week = $2
              AND d.deleted_at IS NULL
              AND r.deleted_at IS NULL
            "#,
        )
        .bind(work_regime_id)
        .bind(day_of_week)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Dated exception of a live regime
    pub async fn find_exception(
        &self,
        work_regime_id: i32,
        date: NaiveDate,
    ) -> AppResult<Option<WorkRegimeException>> {
        let row = sqlx::query_as::<_, WorkRegimeException>(
            r#"
            SELECT e.*
            FROM work_regime_exceptions e
            JOIN work_regimes r ON r.id = e.work_regime_id
            WHERE e.work_regime_id = $1
              AND e.date = $2
              AND e.deleted_at IS NULL
              AND r.deleted_at IS NULL
            "#,
        )
        .bind(work_regime_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
