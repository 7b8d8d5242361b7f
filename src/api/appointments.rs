//! Appointment booking endpoints

use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{dates::parse_timestamp, error::AppResult, AppState};

use super::{request_timezone, validated, AuthenticatedUser, Envelope};

const SUCCESS: &str = "Success";

/// Book or cancel a slot
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AppointmentRequest {
    /// Slot start, e.g. "2020-08-05 10:00"
    #[validate(length(min = 1, message = "Time is required"))]
    pub time: String,
    #[validate(range(min = 1, message = "Invalid workman id"))]
    pub workman_id: i32,
    /// IANA timezone of naive times (defaults to the scheduling timezone)
    pub timezone: Option<String>,
}

/// Move a booked slot
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MoveAppointmentRequest {
    /// Current slot start
    #[validate(length(min = 1, message = "Time is required"))]
    pub time: String,
    /// Requested slot start
    #[validate(length(min = 1, message = "New time is required"))]
    pub new_time: String,
    #[validate(range(min = 1, message = "Invalid workman id"))]
    pub workman_id: i32,
    pub timezone: Option<String>,
}

/// Book an appointment for the authenticated customer
#[utoipa::path(
    post,
    path = "/appointments",
    tag = "appointments",
    security(("bearer_auth" = [])),
    request_body = AppointmentRequest,
    responses(
        (status = 200, description = "Booking outcome", body = Envelope),
        (status = 400, description = "Unparseable time or timezone", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<AppointmentRequest>,
) -> AppResult<Json<Envelope>> {
    let request = validated(request)?;
    let tz = request_timezone(&state, request.timezone.as_deref())?;
    let time = parse_timestamp(&request.time, &tz)?;

    let outcome = state
        .services
        .appointments
        .create_appointment(claims.user_id, request.workman_id, time)
        .await?;
    Ok(Json(Envelope::from_result(outcome, |_| SUCCESS.to_string())))
}

/// Move an appointment of the authenticated customer
#[utoipa::path(
    post,
    path = "/appointments/move",
    tag = "appointments",
    security(("bearer_auth" = [])),
    request_body = MoveAppointmentRequest,
    responses(
        (status = 200, description = "Move outcome", body = Envelope),
        (status = 400, description = "Unparseable time or timezone", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse)
    )
)]
pub async fn move_appointment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<MoveAppointmentRequest>,
) -> AppResult<Json<Envelope>> {
    let request = validated(request)?;
    let tz = request_timezone(&state, request.timezone.as_deref())?;
    let time = parse_timestamp(&request.time, &tz)?;
    let new_time = parse_timestamp(&request.new_time, &tz)?;

    let outcome = state
        .services
        .appointments
        .move_appointment(claims.user_id, request.workman_id, time, new_time)
        .await?;
    Ok(Json(Envelope::from_result(outcome, |_| SUCCESS.to_string())))
}

/// Cancel an appointment of the authenticated customer
#[utoipa::path(
    post,
    path = "/appointments/cancel",
    tag = "appointments",
    security(("bearer_auth" = [])),
    request_body = AppointmentRequest,
    responses(
        (status = 200, description = "Cancellation outcome", body = Envelope),
        (status = 400, description = "Unparseable time or timezone", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse)
    )
)]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<AppointmentRequest>,
) -> AppResult<Json<Envelope>> {
    let request = validated(request)?;
    let tz = request_timezone(&state, request.timezone.as_deref())?;
    let time = parse_timestamp(&request.time, &tz)?;

    let outcome = state
        .services
        .appointments
        .cancel_appointment(claims.user_id, request.workman_id, time)
        .await?;
    Ok(Json(Envelope::from_result(outcome, |_| SUCCESS.to_string())))
}
