//! Slot generation over an effective window

use chrono::{DateTime, Duration, Utc};

use super::regime::EffectiveWindow;

/// Optional bounds narrowing a window (range queries)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clip {
    pub begin: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl Clip {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn between(begin: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            begin: Some(begin),
            end: Some(end),
        }
    }
}

/// Candidate slots of one window, in chronological order.
///
/// Slots follow each other back to back from the (clipped) work start while
/// their start is before the (clipped) work end; the last one may run past
/// it. Slots starting inside `[lunch_begin, lunch_end)` are skipped.
#[derive(Debug, Clone)]
pub struct Slots {
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
    lunch: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl Slots {
    fn is_lunchtime(&self, start: DateTime<Utc>) -> bool {
        self.lunch
            .is_some_and(|(begin, end)| begin <= start && start < end)
    }
}

impl Iterator for Slots {
    type Item = (DateTime<Utc>, DateTime<Utc>);

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.end {
            let start = self.cursor;
            let end = start + self.step;
            self.cursor = end;
            if self.is_lunchtime(start) {
                continue;
            }
            return Some((start, end));
        }
        None
    }
}

/// Slots of `window`, narrowed by `clip`
pub fn generate(window: &EffectiveWindow, clip: Clip) -> Slots {
    let cursor = clip.begin.map_or(window.work_begin, |b| b.max(window.work_begin));
    let end = clip.end.map_or(window.work_end, |e| e.min(window.work_end));
    let step = window.slot_duration();

    Slots {
        cursor,
        // a zero step would never advance
        end: if step > Duration::zero() { end } else { cursor },
        step,
        lunch: window.lunch_begin.zip(window.lunch_end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 8, 5, h, m, 0).unwrap()
    }

    fn window(lunch: Option<(u32, u32)>, duration: i32) -> EffectiveWindow {
        EffectiveWindow {
            work_regime_id: 1,
            work_begin: at(9, 0),
            work_end: at(18, 0),
            lunch_begin: lunch.map(|(b, _)| at(b, 0)),
            lunch_end: lunch.map(|(_, e)| at(e, 0)),
            duration,
            is_overnight: false,
        }
    }

    fn start_hours(slots: Slots) -> Vec<u32> {
        slots.map(|(start, _)| start.hour()).collect()
    }

    #[test]
    fn test_hourly_slots_skip_lunch() {
        let slots = generate(&window(Some((14, 15)), 3600), Clip::none());
        assert_eq!(start_hours(slots), vec![9, 10, 11, 12, 13, 15, 16, 17]);
    }

    #[test]
    fn test_slot_end_follows_duration() {
        let slots: Vec<_> = generate(&window(None, 1800), Clip::none()).collect();
        assert_eq!(slots.len(), 18);
        assert_eq!(slots[0], (at(9, 0), at(9, 30)));
        assert_eq!(slots[17], (at(17, 30), at(18, 0)));
    }

    #[test]
    fn test_partial_last_slot_is_kept() {
        let slots: Vec<_> = generate(&window(None, 5400), Clip::none()).collect();
        // 09:00, 10:30, ..., 16:30 (ends 18:00); 9 hours / 1.5 = 6 slots exactly
        assert_eq!(slots.len(), 6);

        let slots: Vec<_> = generate(&window(None, 2 * 3600), Clip::none()).collect();
        // 09, 11, 13, 15, 17 -> the 17:00 slot runs until 19:00
        assert_eq!(slots.len(), 5);
        assert_eq!(slots[4], (at(17, 0), at(19, 0)));
    }

    #[test]
    fn test_lunch_boundaries_are_half_open() {
        let slots = generate(&window(Some((13, 14)), 1800), Clip::none());
        let starts: Vec<_> = slots.map(|(s, _)| (s.hour(), s.minute())).collect();
        assert!(!starts.contains(&(13, 0)));
        assert!(!starts.contains(&(13, 30)));
        assert!(starts.contains(&(12, 30)));
        assert!(starts.contains(&(14, 0)));
    }

    #[test]
    fn test_clip_narrows_window() {
        let slots = generate(&window(Some((14, 15)), 3600), Clip::between(at(14, 0), at(16, 0)));
        assert_eq!(start_hours(slots), vec![15]);

        let slots = generate(&window(None, 3600), Clip::between(at(14, 0), at(16, 0)));
        assert_eq!(start_hours(slots), vec![14, 15]);

        let slots = generate(&window(None, 3600), Clip::between(at(6, 0), at(23, 0)));
        assert_eq!(start_hours(slots).len(), 9);
    }

    #[test]
    fn test_clip_outside_window_is_empty() {
        let slots = generate(&window(None, 3600), Clip::between(at(18, 0), at(20, 0)));
        assert_eq!(slots.count(), 0);
    }

    #[test]
    fn test_generation_is_restartable() {
        let w = window(Some((14, 15)), 3600);
        let first: Vec<_> = generate(&w, Clip::none()).collect();
        let second: Vec<_> = generate(&w, Clip::none()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_duration_yields_nothing() {
        assert_eq!(generate(&window(None, 0), Clip::none()).count(), 0);
    }
}
