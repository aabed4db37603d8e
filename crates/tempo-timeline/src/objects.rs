//! Index-addressed judgement storage
//!
//! One slot per beatmap hit object. Object indices increase with time in a
//! beatmap, so slot order already is time order and no sorting is needed.
//! Slots stay empty until the object is judged.

use crate::event::{JudgementEvent, Sentinel, TimelineEvent};
use crate::TimelineError;

#[derive(Debug, Clone)]
pub struct ObjectContainer {
    slots: Vec<Option<JudgementEvent>>,
    /// Lowest and highest judged slot
    first_judged: Option<usize>,
    last_judged: Option<usize>,
    judged: usize,
    misses: usize,
    sentinel: JudgementEvent,
}

impl ObjectContainer {
    pub fn new(object_count: usize) -> Self {
        Self {
            slots: vec![None; object_count],
            first_judged: None,
            last_judged: None,
            judged: 0,
            misses: 0,
            sentinel: JudgementEvent::sentinel(),
        }
    }

    /// Store a judgement in its object's slot, returning the one it replaced
    pub fn add(&mut self, event: JudgementEvent) -> Result<Option<JudgementEvent>, TimelineError> {
        let index = self.slot_index(event.object_index)?;
        let is_miss = event.result.is_miss();
        let previous = self.slots[index].replace(event);

        match &previous {
            Some(old) if old.result.is_miss() => self.misses -= 1,
            Some(_) => {}
            None => self.judged += 1,
        }
        if is_miss {
            self.misses += 1;
        }
        self.first_judged = Some(self.first_judged.map_or(index, |first| first.min(index)));
        self.last_judged = Some(self.last_judged.map_or(index, |last| last.max(index)));

        Ok(previous)
    }

    /// Clear an object's slot
    pub fn remove(&mut self, object_index: i32) -> Option<JudgementEvent> {
        let index = self.slot_index(object_index).ok()?;
        let removed = self.slots[index].take()?;
        self.judged -= 1;
        if removed.result.is_miss() {
            self.misses -= 1;
        }

        if self.judged == 0 {
            self.first_judged = None;
            self.last_judged = None;
        } else {
            if self.first_judged == Some(index) {
                self.first_judged =
                    (index + 1..self.slots.len()).find(|&i| self.slots[i].is_some());
            }
            if self.last_judged == Some(index) {
                self.last_judged = (0..index).rev().find(|&i| self.slots[i].is_some());
            }
        }
        Some(removed)
    }

    pub fn get(&self, object_index: i32) -> Option<&JudgementEvent> {
        let index = usize::try_from(object_index).ok()?;
        self.slots.get(index)?.as_ref()
    }

    /// Latest judgement with `time <= time`
    pub fn event_at(&self, time: f64) -> Option<&JudgementEvent> {
        let latest = self.latest()?;
        if time >= latest.time {
            return Some(latest);
        }
        let earliest = self.earliest()?;
        if time < earliest.time || time.is_nan() {
            return None;
        }

        // Binary search over slots; an empty midpoint falls back to the
        // nearest judged slot at or below it within the current window.
        let mut lo = self.first_judged?;
        let mut hi = self.last_judged? + 1;
        let mut best = None;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match (lo..=mid).rev().find(|&i| self.slots[i].is_some()) {
                Some(i) => {
                    let judged = self.slots[i].as_ref()?;
                    if judged.time <= time {
                        best = Some(judged);
                        lo = mid + 1;
                    } else {
                        hi = i;
                    }
                }
                None => lo = mid + 1,
            }
        }
        best
    }

    pub fn event_at_or_default(&self, time: f64) -> &JudgementEvent {
        self.event_at(time).unwrap_or(&self.sentinel)
    }

    pub fn earliest_event_time(&self) -> Option<f64> {
        self.earliest().map(TimelineEvent::time)
    }

    pub fn latest_event_time(&self) -> Option<f64> {
        self.latest().map(TimelineEvent::time)
    }

    /// Number of objects currently judged as a miss
    pub fn miss_count(&self) -> usize {
        self.misses
    }

    pub fn judged_count(&self) -> usize {
        self.judged
    }

    pub fn object_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.judged == 0
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.first_judged = None;
        self.last_judged = None;
        self.judged = 0;
        self.misses = 0;
    }

    /// Judged objects in index order
    pub fn iter(&self) -> impl Iterator<Item = &JudgementEvent> {
        self.slots.iter().flatten()
    }

    fn earliest(&self) -> Option<&JudgementEvent> {
        self.slots.get(self.first_judged?)?.as_ref()
    }

    fn latest(&self) -> Option<&JudgementEvent> {
        self.slots.get(self.last_judged?)?.as_ref()
    }

    fn slot_index(&self, object_index: i32) -> Result<usize, TimelineError> {
        usize::try_from(object_index)
            .ok()
            .filter(|&i| i < self.slots.len())
            .ok_or(TimelineError::ObjectIndexOutOfRange {
                index: object_index,
                count: self.slots.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_protocol::HitResult;

    fn judgement(object_index: i32, time: f64, result: HitResult) -> JudgementEvent {
        JudgementEvent {
            time,
            object_index,
            result,
            ..JudgementEvent::sentinel()
        }
    }

    #[test]
    fn test_sparse_lookup() {
        let mut objects = ObjectContainer::new(10);
        objects.add(judgement(1, 100.0, HitResult::Great)).unwrap();
        objects.add(judgement(4, 400.0, HitResult::Good)).unwrap();
        objects.add(judgement(8, 800.0, HitResult::Meh)).unwrap();

        assert!(objects.event_at(50.0).is_none());
        assert_eq!(objects.event_at(100.0).unwrap().object_index, 1);
        assert_eq!(objects.event_at(399.0).unwrap().object_index, 1);
        assert_eq!(objects.event_at(400.0).unwrap().object_index, 4);
        assert_eq!(objects.event_at(799.0).unwrap().object_index, 4);
        assert_eq!(objects.event_at(5000.0).unwrap().object_index, 8);
        assert_eq!(objects.earliest_event_time(), Some(100.0));
        assert_eq!(objects.latest_event_time(), Some(800.0));
    }

    #[test]
    fn test_miss_counter_tracks_replacements() {
        let mut objects = ObjectContainer::new(4);
        objects.add(judgement(2, 200.0, HitResult::Miss)).unwrap();
        assert_eq!(objects.miss_count(), 1);

        objects.add(judgement(2, 210.0, HitResult::Miss)).unwrap();
        assert_eq!(objects.miss_count(), 1);

        objects.add(judgement(2, 220.0, HitResult::Great)).unwrap();
        assert_eq!(objects.miss_count(), 0);
        assert_eq!(objects.judged_count(), 1);
    }

    #[test]
    fn test_bounds_follow_removals() {
        let mut objects = ObjectContainer::new(10);
        objects.add(judgement(3, 300.0, HitResult::Great)).unwrap();
        objects.add(judgement(6, 600.0, HitResult::Good)).unwrap();
        objects.add(judgement(1, 100.0, HitResult::Meh)).unwrap();
        assert_eq!(objects.earliest_event_time(), Some(100.0));
        assert_eq!(objects.latest_event_time(), Some(600.0));

        assert!(objects.remove(1).is_some());
        assert!(objects.remove(6).is_some());
        assert_eq!(objects.earliest_event_time(), Some(300.0));
        assert_eq!(objects.latest_event_time(), Some(300.0));
        assert_eq!(objects.event_at(450.0).unwrap().object_index, 3);

        assert!(objects.remove(3).is_some());
        assert!(objects.event_at(450.0).is_none());
        assert_eq!(objects.latest_event_time(), None);

        objects.add(judgement(9, 900.0, HitResult::Great)).unwrap();
        assert_eq!(objects.earliest_event_time(), Some(900.0));
        objects.clear();
        assert_eq!(objects.earliest_event_time(), None);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut objects = ObjectContainer::new(2);
        let err = objects.add(judgement(2, 0.0, HitResult::Great)).unwrap_err();
        assert!(matches!(
            err,
            TimelineError::ObjectIndexOutOfRange { index: 2, count: 2 }
        ));
        assert!(objects.add(judgement(-1, 0.0, HitResult::Great)).is_err());
    }
}
