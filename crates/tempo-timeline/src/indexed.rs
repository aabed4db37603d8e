//! Index-ordered, time-queryable container
//!
//! Events are kept sorted by object index rather than by time, but are
//! queried by time as well as by index. Both orders agree for well-formed
//! input since the object index and the packet time advance together.

use crate::event::{IndexedEvent, Sentinel, TimelineEvent};

#[derive(Debug, Clone)]
pub struct IndexOrderedContainer<E> {
    events: Vec<E>,
    min_index: i32,
    max_index: i32,
    sentinel: E,
}

impl<E: IndexedEvent + Sentinel> Default for IndexOrderedContainer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: IndexedEvent + Sentinel> IndexOrderedContainer<E> {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            min_index: i32::MAX,
            max_index: i32::MIN,
            sentinel: E::sentinel(),
        }
    }

    /// Insert after every stored event with the same or a lower index
    pub fn add(&mut self, event: E) {
        while self.remove(&event) {}

        let index = event.object_index();
        let position = if self.events.is_empty() || index >= self.max_index {
            self.events.len()
        } else if index < self.min_index {
            0
        } else {
            self.events.partition_point(|e| e.object_index() <= index)
        };
        self.events.insert(position, event);
        self.refresh_bounds();
    }

    /// Remove the first stored event with the same index and time that is
    /// redundant relative to `event`
    pub fn remove(&mut self, event: &E) -> bool {
        let index = event.object_index();
        if self.events.is_empty() || index < self.min_index || index > self.max_index {
            return false;
        }

        let start = self.events.partition_point(|e| e.object_index() < index);
        let found = self.events[start..]
            .iter()
            .take_while(|stored| stored.object_index() == index)
            .position(|stored| stored.time() == event.time() && stored.is_redundant(event));

        match found {
            Some(offset) => {
                self.events.remove(start + offset);
                self.refresh_bounds();
                true
            }
            None => false,
        }
    }

    /// Latest event with `event.time <= time`
    pub fn event_at(&self, time: f64) -> Option<&E> {
        let first = self.events.first()?;
        let last = self.events.last()?;
        if time >= last.time() {
            return Some(last);
        }
        if time < first.time() || time.is_nan() {
            return None;
        }

        let position = self.events.partition_point(|e| e.time() <= time);
        position.checked_sub(1).and_then(|i| self.events.get(i))
    }

    pub fn event_at_or_default(&self, time: f64) -> &E {
        self.event_at(time).unwrap_or(&self.sentinel)
    }

    /// Latest event whose object index is `<= object_index`
    pub fn event_for_index(&self, object_index: i32) -> Option<&E> {
        if self.events.is_empty() || object_index < self.min_index {
            return None;
        }
        if object_index >= self.max_index {
            return self.events.last();
        }

        let position = self
            .events
            .partition_point(|e| e.object_index() <= object_index);
        position.checked_sub(1).and_then(|i| self.events.get(i))
    }

    pub fn earliest_event_time(&self) -> Option<f64> {
        self.events.first().map(TimelineEvent::time)
    }

    pub fn latest_event_time(&self) -> Option<f64> {
        self.events.last().map(TimelineEvent::time)
    }

    pub fn min_index(&self) -> Option<i32> {
        (!self.events.is_empty()).then_some(self.min_index)
    }

    pub fn max_index(&self) -> Option<i32> {
        (!self.events.is_empty()).then_some(self.max_index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.refresh_bounds();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.events.iter()
    }

    fn refresh_bounds(&mut self) {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => {
                self.min_index = first.object_index();
                self.max_index = last.object_index();
            }
            _ => {
                self.min_index = i32::MAX;
                self.max_index = i32::MIN;
            }
        }
    }
}
