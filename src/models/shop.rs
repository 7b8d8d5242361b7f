//! Repair shop and mechanic models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Repair shop (one business location)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RepairShop {
    pub id: i32,
    pub name: String,
    /// Regime used by mechanics without an individual one
    pub default_work_regime_id: Option<i32>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Repair mechanic
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Workman {
    pub id: i32,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub repair_shop_id: i32,
    /// Replaces the shop's default regime for this mechanic only
    pub individual_work_regime_id: Option<i32>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Workman {
    /// Regime in effect for this mechanic: the individual one, else the
    /// shop default, else none.
    pub fn effective_work_regime_id(&self, shop: Option<&RepairShop>) -> Option<i32> {
        if let Some(id) = self.individual_work_regime_id {
            return Some(id);
        }
        match shop {
            Some(shop) if shop.id == self.repair_shop_id => shop.default_work_regime_id,
            _ => None,
        }
    }
}
