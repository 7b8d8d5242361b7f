//! Derived slot information (never persisted)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One bookable interval on one mechanic's calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SlotInfo {
    pub repair_shop_id: i32,
    pub workman_id: i32,
    pub work_regime_id: i32,
    pub datetime_begin: DateTime<Utc>,
    pub datetime_end: DateTime<Utc>,
    /// Slot duration (seconds)
    pub duration: i32,
    pub is_occupied: bool,
}

/// Which part of a slot listing to keep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    #[default]
    All,
    Available,
    Occupied,
}

impl SlotState {
    pub fn matches(self, slot: &SlotInfo) -> bool {
        match self {
            SlotState::All => true,
            SlotState::Available => !slot.is_occupied,
            SlotState::Occupied => slot.is_occupied,
        }
    }
}
