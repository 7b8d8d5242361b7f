//! Availability endpoints: slot listings, workload and free start times

use axum::{
    extract::{Query, State},
    Json,
};
use chrono_tz::Tz;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    dates::{parse_date, parse_timestamp},
    error::AppResult,
    models::slot::{SlotInfo, SlotState},
    scheduling::SlotFilter,
    AppState,
};

use super::{request_timezone, Envelope};

/// Scope of an availability query.
///
/// Either `date` or both `datetime_begin` and `datetime_end` must be given;
/// `workman_id` narrows further than `repair_shop_id`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SlotQueryParams {
    /// Single day, e.g. "2020-08-05"
    pub date: Option<String>,
    /// Range start, e.g. "2020-08-05 09:00"
    pub datetime_begin: Option<String>,
    /// Range end
    pub datetime_end: Option<String>,
    pub repair_shop_id: Option<i32>,
    pub workman_id: Option<i32>,
    /// IANA timezone of naive times and of displayed start times
    pub timezone: Option<String>,
    /// Read the archived appointment book
    pub from_archive: Option<bool>,
    /// Slot listing only: all, available or occupied
    pub state: Option<SlotState>,
}

impl SlotQueryParams {
    fn filter(&self, tz: &Tz) -> AppResult<SlotFilter> {
        Ok(SlotFilter {
            date: self.date.as_deref().map(|d| parse_date(d, tz)).transpose()?,
            datetime_begin: self
                .datetime_begin
                .as_deref()
                .map(|t| parse_timestamp(t, tz))
                .transpose()?,
            datetime_end: self
                .datetime_end
                .as_deref()
                .map(|t| parse_timestamp(t, tz))
                .transpose()?,
            repair_shop_id: self.repair_shop_id,
            workman_id: self.workman_id,
            from_archive: self.from_archive.unwrap_or(false),
        })
    }
}

/// List candidate slots
#[utoipa::path(
    get,
    path = "/slots",
    tag = "availability",
    params(SlotQueryParams),
    responses(
        (status = 200, description = "Slots in scope", body = Vec<SlotInfo>),
        (status = 400, description = "Invalid scope or unparseable time", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_slots(
    State(state): State<AppState>,
    Query(params): Query<SlotQueryParams>,
) -> AppResult<Json<Vec<SlotInfo>>> {
    let tz = request_timezone(&state, params.timezone.as_deref())?;
    let filter = params.filter(&tz)?;

    let slots = state
        .services
        .appointments
        .slots(&filter, params.state.unwrap_or_default())
        .await?;
    Ok(Json(slots))
}

/// Share of occupied slots in scope
#[utoipa::path(
    get,
    path = "/workload",
    tag = "availability",
    params(SlotQueryParams),
    responses(
        (status = 200, description = "Workload report", body = Envelope),
        (status = 400, description = "Unparseable time or timezone", body = crate::error::ErrorResponse)
    )
)]
pub async fn workload(
    State(state): State<AppState>,
    Query(params): Query<SlotQueryParams>,
) -> AppResult<Json<Envelope>> {
    let tz = request_timezone(&state, params.timezone.as_deref())?;
    let filter = params.filter(&tz)?;

    let report = state.services.appointments.workload(&filter).await?;
    Ok(Json(Envelope::from_result(report, |info| info)))
}

/// Free start times in scope
#[utoipa::path(
    get,
    path = "/available-time",
    tag = "availability",
    params(SlotQueryParams),
    responses(
        (status = 200, description = "Available start times", body = Envelope),
        (status = 400, description = "Unparseable time or timezone", body = crate::error::ErrorResponse)
    )
)]
pub async fn available_time(
    State(state): State<AppState>,
    Query(params): Query<SlotQueryParams>,
) -> AppResult<Json<Envelope>> {
    let tz = request_timezone(&state, params.timezone.as_deref())?;
    let filter = params.filter(&tz)?;

    let report = state.services.appointments.available_time(&filter, &tz).await?;
    Ok(Json(Envelope::from_result(report, |info| info)))
}
