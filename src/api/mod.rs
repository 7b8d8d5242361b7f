//! API handlers for Autoshop REST endpoints

pub mod appointments;
pub mod availability;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dates,
    error::{AppError, AppResult},
    models::user::UserClaims,
    AppState,
};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Outcome body shared by booking and report endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Envelope {
    /// Whether the request was refused
    pub is_error: bool,
    /// Human readable result
    pub info: String,
}

impl Envelope {
    pub fn success(info: impl Into<String>) -> Self {
        Self {
            is_error: false,
            info: info.into(),
        }
    }

    pub fn failure(info: impl ToString) -> Self {
        Self {
            is_error: true,
            info: info.to_string(),
        }
    }

    /// `Ok` becomes the given success text, `Err` its display message
    pub fn from_result<T, E: std::fmt::Display>(result: Result<T, E>, success: impl FnOnce(T) -> String) -> Self {
        match result {
            Ok(value) => Self::success(success(value)),
            Err(e) => Self::failure(e),
        }
    }
}

/// Run field validation, mapping failures to a 400
pub(crate) fn validated<T: Validate>(data: T) -> AppResult<T> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(data)
}

/// Request timezone, or the configured scheduling one
pub(crate) fn request_timezone(state: &AppState, name: Option<&str>) -> AppResult<Tz> {
    dates::parse_timezone(name, state.services.appointments.settings().timezone)
}
