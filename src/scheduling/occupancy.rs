//! Occupancy matching of candidate slots against booked appointments

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::regime::EffectiveWindow;
use crate::{
    error::AppResult,
    models::{appointment::AppointmentBook, shop::Workman, slot::SlotInfo},
    repository::SchedulingStore,
};

/// Tag each candidate slot of `workman` as occupied when `book` holds a
/// record starting exactly at the slot start.
pub async fn mark(
    store: &dyn SchedulingStore,
    book: AppointmentBook,
    workman: &Workman,
    window: &EffectiveWindow,
    slots: impl IntoIterator<Item = (DateTime<Utc>, DateTime<Utc>)>,
) -> AppResult<Vec<SlotInfo>> {
    let slots: Vec<_> = slots.into_iter().collect();
    let (Some(first), Some(last)) = (slots.first(), slots.last()) else {
        return Ok(Vec::new());
    };

    let booked: HashSet<DateTime<Utc>> = store
        .booked_times(book, workman.id, first.0, last.0)
        .await?
        .into_iter()
        .collect();

    Ok(slots
        .into_iter()
        .map(|(begin, end)| SlotInfo {
            repair_shop_id: workman.repair_shop_id,
            workman_id: workman.id,
            work_regime_id: window.work_regime_id,
            datetime_begin: begin,
            datetime_end: end,
            duration: window.duration,
            is_occupied: booked.contains(&begin),
        })
        .collect())
}
