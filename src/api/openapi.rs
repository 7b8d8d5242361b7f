//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{appointments, availability, health, Envelope};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Autoshop API",
        version = "1.0.0",
        description = "Repair shop appointment availability and booking REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Appointments
        appointments::create_appointment,
        appointments::move_appointment,
        appointments::cancel_appointment,
        // Availability
        availability::list_slots,
        availability::workload,
        availability::available_time,
    ),
    components(
        schemas(
            // Appointments
            appointments::AppointmentRequest,
            appointments::MoveAppointmentRequest,
            crate::models::appointment::Appointment,
            // Availability
            crate::models::slot::SlotInfo,
            crate::models::slot::SlotState,
            Envelope,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "appointments", description = "Booking, moving and cancelling appointments"),
        (name = "availability", description = "Slots, workload and free start times")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
