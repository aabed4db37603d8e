//! Time-ordered event container
//!
//! Keeps events sorted ascending by time and answers "which event was
//! current at time `t`" with a binary search. Events sharing a timestamp are
//! resolved through [`TimelineEvent::is_redundant`]: a redundant stored event
//! is replaced by the incoming one, anything else is kept and the incoming
//! event is placed after it, so the most recently inserted event wins ties.

use crate::event::{Sentinel, TimelineEvent};

#[derive(Debug, Clone)]
pub struct EventContainer<E> {
    events: Vec<E>,
    sentinel: E,
}

impl<E: TimelineEvent + Sentinel> Default for EventContainer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TimelineEvent + Sentinel> EventContainer<E> {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            sentinel: E::sentinel(),
        }
    }

    /// Insert an event, replacing any stored event it makes redundant
    pub fn add(&mut self, event: E) {
        while self.remove(&event) {}

        let index = self.upper_bound(event.time());
        self.events.insert(index, event);
    }

    /// Remove the earliest stored event at the same time that is redundant
    /// relative to `event`
    pub fn remove(&mut self, event: &E) -> bool {
        let time = event.time();
        let start = self.lower_bound(time);
        let found = self.events[start..]
            .iter()
            .take_while(|stored| stored.time() == time)
            .position(|stored| stored.is_redundant(event));

        match found {
            Some(offset) => {
                self.events.remove(start + offset);
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

        let index = self.upper_bound(time);
        index.checked_sub(1).and_then(|i| self.events.get(i))
    }

    /// Like [`event_at`](Self::event_at) but falls back to the kind's sentinel
    pub fn event_at_or_default(&self, time: f64) -> &E {
        self.event_at(time).unwrap_or(&self.sentinel)
    }

    pub fn sentinel(&self) -> &E {
        &self.sentinel
    }

    pub fn earliest_event_time(&self) -> Option<f64> {
        self.events.first().map(TimelineEvent::time)
    }

    pub fn latest_event_time(&self) -> Option<f64> {
        self.events.last().map(TimelineEvent::time)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.events
    }

    /// First index whose time is `>= time`
    fn lower_bound(&self, time: f64) -> usize {
        self.events.partition_point(|e| e.time() < time)
    }

    /// First index whose time is `> time`
    fn upper_bound(&self, time: f64) -> usize {
        match self.events.last() {
            Some(last) if last.time() <= time => self.events.len(),
            _ => self.events.partition_point(|e| e.time() <= time),
        }
    }
}
