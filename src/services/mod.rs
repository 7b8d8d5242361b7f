//! Business logic services

pub mod appointments;

use std::sync::Arc;

use crate::{repository::SchedulingStore, scheduling::ScheduleSettings};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub appointments: appointments::AppointmentsService,
}

impl Services {
    /// Create all services over the given record store
    pub fn new(store: Arc<dyn SchedulingStore>, settings: ScheduleSettings) -> Self {
        Self {
            appointments: appointments::AppointmentsService::new(store, settings),
        }
    }
}
